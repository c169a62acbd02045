//! Pixel layout of the chart: plot area, point positions and y-axis ticks.
//!
//! Kept free of any browser types so the geometry can be checked natively.

const TICK_COUNT: f64 = 5.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 16.,
            right: 16.,
            bottom: 32.,
            left: 40.,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x..=self.right()).contains(&x) && (self.y..=self.bottom()).contains(&y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub label: String,
}

/// Horizontal grid line on the y axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub area: PlotArea,
    pub points: Vec<PlotPoint>,
    pub ticks: Vec<Tick>,
    /// Width of one category slot.
    pub slot_width: f64,
    /// Pixel row of the zero line, clamped into the plot area.
    pub baseline_y: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Round `raw` up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let nice = if norm <= 1. {
        1.
    } else if norm <= 2. {
        2.
    } else if norm <= 5. {
        5.
    } else {
        10.
    };
    nice * magnitude
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1. {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    format!("{value:.decimals$}")
}

impl ChartLayout {
    pub fn compute(
        width: f64,
        height: f64,
        padding: Padding,
        labels: &[String],
        values: &[f64],
    ) -> Self {
        let area = PlotArea {
            x: padding.left,
            y: padding.top,
            width: (width - padding.left - padding.right).max(0.),
            height: (height - padding.top - padding.bottom).max(0.),
        };

        let lo = values.iter().copied().fold(0f64, f64::min);
        let mut hi = values.iter().copied().fold(0f64, f64::max);
        if hi - lo <= 0. {
            hi = lo + 1.;
        }
        // Halved operands keep spans finite for samples near ±f64::MAX.
        let mut step = nice_step(hi / TICK_COUNT - lo / TICK_COUNT);
        if !step.is_finite() || step <= 0. {
            step = hi / TICK_COUNT - lo / TICK_COUNT;
        }
        let mut y_min = (lo / step).floor() * step;
        if !y_min.is_finite() {
            y_min = lo;
        }
        let mut y_max = (hi / step).ceil() * step;
        if !y_max.is_finite() {
            y_max = hi;
        }
        let half_span = y_max * 0.5 - y_min * 0.5;

        let to_y = |v: f64| area.y + area.height * (1. - (v * 0.5 - y_min * 0.5) / half_span);

        let count = values.len().max(1);
        let slot_width = area.width / count as f64;
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| PlotPoint {
                x: area.x + slot_width * (i as f64 + 0.5),
                y: to_y(value),
                value,
                label: labels.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        let steps = (half_span / (step * 0.5)).round().min(TICK_COUNT + 2.) as usize;
        let ticks = (0..=steps)
            .map(|i| y_min + step * i as f64)
            .filter(|value| value.is_finite() && *value <= y_max + step * 1e-9)
            .map(|value| Tick {
                y: to_y(value.min(y_max)),
                value,
                label: tick_label(value, step),
            })
            .collect();

        Self {
            area,
            points,
            ticks,
            slot_width,
            baseline_y: to_y(0f64.clamp(y_min, y_max)),
            y_min,
            y_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleWindow;

    fn layout_of(values: &[f64]) -> ChartLayout {
        let window = SampleWindow::default();
        ChartLayout::compute(400., 300., Padding::default(), window.labels(), values)
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(3.8), 5.);
        assert_eq!(nice_step(0.15), 0.2);
        assert_eq!(nice_step(70.), 100.);
        assert_eq!(nice_step(1.), 1.);
    }

    #[test]
    fn test_seed_layout() {
        let window = SampleWindow::default();
        let layout = layout_of(window.values());
        assert_eq!(layout.y_min, 0.);
        assert_eq!(layout.y_max, 20.);
        let labels: Vec<&str> = layout.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0", "5", "10", "15", "20"]);
        assert_eq!(layout.points.len(), 6);
        assert_eq!(layout.points[1].label, "Blue");
        assert_eq!(layout.baseline_y, layout.area.bottom());
    }

    #[test]
    fn test_points_stay_inside_area() {
        for values in [
            vec![12., 19., 3., 5., 2., 3.],
            vec![-4., 0., 8.5, 1e6, 3., 0.],
            vec![0.; 6],
            vec![-1., -2., -3., -4., -5., -6.],
        ] {
            let layout = layout_of(&values);
            for pair in layout.points.windows(2) {
                assert!(pair[0].x < pair[1].x);
            }
            for p in &layout.points {
                assert!(layout.area.contains(p.x, p.y), "{p:?} outside {:?}", layout.area);
            }
            assert!(layout.area.contains(layout.area.x, layout.baseline_y));
        }
    }

    #[test]
    fn test_larger_value_is_higher() {
        let layout = layout_of(&[1., 2., 3., 4., 5., 6.]);
        assert!(layout.points[5].y < layout.points[0].y);
    }

    #[test]
    fn test_fractional_ticks() {
        let layout = layout_of(&[0.1, 0.3, 0.2, 0.5, 0.4, 0.6]);
        assert_eq!(layout.ticks.last().unwrap().label, "0.6");
        assert_eq!(layout.ticks[1].label, "0.2");
    }

    #[test]
    fn test_extreme_finite_values() {
        for values in [
            vec![12., 19., 3., 5., 2., 1.7e308],
            vec![-1e308, 0., 1e308, 3., 0., 1.],
            vec![f64::MAX, f64::MIN, 0., 1., 2., 3.],
            vec![f64::MAX; 6],
        ] {
            let layout = layout_of(&values);
            assert!(layout.y_min.is_finite() && layout.y_max.is_finite());
            assert!(!layout.ticks.is_empty());
            assert!(layout.ticks.len() <= TICK_COUNT as usize + 3);
            for tick in &layout.ticks {
                assert!(tick.value.is_finite());
                assert!(layout.area.contains(layout.area.x, tick.y), "{tick:?}");
            }
            for p in &layout.points {
                assert!(layout.area.contains(p.x, p.y), "{p:?} outside {:?}", layout.area);
            }
            assert!(layout.area.contains(layout.area.x, layout.baseline_y));
        }
    }

    #[test]
    fn test_huge_frame_still_lays_out() {
        let mut window = SampleWindow::default();
        window.apply_frame(r#"{"value": 1.7e308}"#).unwrap();
        let layout = layout_of(window.values());
        assert_eq!(layout.y_max, 1.7e308);
        assert_eq!(layout.points[5].y, layout.area.y);
    }

    #[test]
    fn test_degenerate_canvas() {
        let layout = ChartLayout::compute(10., 10., Padding::default(), &[], &[1., 2.]);
        assert_eq!(layout.area.width, 0.);
        assert_eq!(layout.area.height, 0.);
        assert_eq!(layout.points[0].label, "");
    }
}
