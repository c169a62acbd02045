use crate::color::{colors, Color};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

/// Presentation settings for the chart surface. Labels and samples live in
/// the [`SampleWindow`](crate::SampleWindow).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub dataset_label: String,
    /// Per-point fill colors, cycled when shorter than the sample count.
    pub background_color: Vec<Color>,
    pub border_color: Color,
    pub border_width: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            dataset_label: "# of Votes".to_owned(),
            background_color: vec![colors::SERIES],
            border_color: colors::SERIES.with_alpha(1.),
            border_width: 1.,
        }
    }
}

impl ChartConfig {
    /// Fill color of the point at `index`.
    pub fn point_color(&self, index: usize) -> Color {
        if self.background_color.is_empty() {
            return colors::SERIES;
        }
        self.background_color[index % self.background_color.len()]
    }
}
