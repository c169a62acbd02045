//! Fixed six-slot sample window rendered by the chart.

use crate::live::{self, FrameError};
use serde::{Deserialize, Serialize};

pub const WINDOW_LEN: usize = 6;

pub const SEED_VALUES: [f64; WINDOW_LEN] = [12., 19., 3., 5., 2., 3.];
pub const SEED_LABELS: [&str; WINDOW_LEN] = ["Red", "Blue", "Yellow", "Green", "Purple", "Orange"];

/// Ordered samples, oldest first, bound to fixed category labels.
///
/// The window always holds exactly [`WINDOW_LEN`] samples. Labels are set at
/// construction and never change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleWindow {
    labels: [String; WINDOW_LEN],
    values: [f64; WINDOW_LEN],
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(SEED_LABELS.map(String::from), SEED_VALUES)
    }
}

impl SampleWindow {
    pub fn new(labels: [String; WINDOW_LEN], values: [f64; WINDOW_LEN]) -> Self {
        Self { labels, values }
    }

    /// Drop the oldest sample and append `value`. Returns the evicted sample.
    pub fn push(&mut self, value: f64) -> f64 {
        let evicted = self.values[0];
        self.values.rotate_left(1);
        self.values[WINDOW_LEN - 1] = value;
        evicted
    }

    /// Parse one push-channel frame and append its value.
    ///
    /// On error the window is left untouched.
    pub fn apply_frame(&mut self, text: &str) -> Result<f64, FrameError> {
        let value = live::parse_value(text)?;
        self.push(value);
        Ok(value)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub const fn len(&self) -> usize {
        WINDOW_LEN
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_window() {
        let window = SampleWindow::default();
        assert_eq!(window.values(), &SEED_VALUES);
        assert_eq!(window.labels(), &SEED_LABELS);
        assert_eq!(window.len(), 6);
    }

    #[test]
    fn test_push_shifts_oldest_out() {
        let mut window = SampleWindow::default();
        assert_eq!(window.push(7.), 12.);
        assert_eq!(window.values(), &[19., 3., 5., 2., 3., 7.]);
        assert_eq!(window.push(9.), 19.);
        assert_eq!(window.values(), &[3., 5., 2., 3., 7., 9.]);
    }

    #[test]
    fn test_window_tracks_last_values() {
        let mut window = SampleWindow::default();
        let incoming: Vec<f64> = (1..=20).map(|v| v as f64 * 1.5).collect();
        for (n, &v) in incoming.iter().enumerate() {
            window.push(v);
            let seen = n + 1;
            let tail = seen.min(WINDOW_LEN);
            assert_eq!(window.len(), WINDOW_LEN);
            assert_eq!(
                &window.values()[WINDOW_LEN - tail..],
                &incoming[seen - tail..seen]
            );
        }
        assert_eq!(window.labels(), &SEED_LABELS);
    }

    #[test]
    fn test_apply_frame() {
        let mut window = SampleWindow::default();
        assert_eq!(window.apply_frame(r#"{"value": 7}"#).unwrap(), 7.);
        assert_eq!(window.apply_frame(r#"{"value": 9, "id": "x"}"#).unwrap(), 9.);
        assert_eq!(window.values(), &[3., 5., 2., 3., 7., 9.]);
    }

    #[test]
    fn test_bad_frame_leaves_window_untouched() {
        let mut window = SampleWindow::default();
        for frame in [
            "not json",
            r#"{"type": "status", "stream": "Stream initiated"}"#,
            r#"{"value": "7"}"#,
            r#"[7]"#,
        ] {
            assert!(window.apply_frame(frame).is_err(), "{frame}");
            assert_eq!(window, SampleWindow::default());
        }
    }
}
