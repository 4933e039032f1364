use log::trace;
use ndarray::Array1;

use crate::error::{InterpolateError, Result};

/// Strictly increasing partition `b[0] < b[1] < ... < b[m]` of a real interval into `m` intervals.
///
/// Interval `j` is `[b[j], b[j+1])`, except the last one which is closed on both ends.
#[derive(Debug, Clone)]
pub struct Breakpoints {
    values: Array1<f64>,
    is_spacing_uniform: bool,
}

impl Breakpoints {
    pub fn new(values: Array1<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(InterpolateError::insufficient(2, values.len(), "breakpoints"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InterpolateError::NotIncreasing(
                "breakpoints must be finite".to_string(),
            ));
        }

        let spacing: Vec<f64> = values
            .windows(2)
            .into_iter()
            .map(|w| w[1] - w[0])
            .collect();

        if spacing.iter().any(|s| *s <= 0.0) {
            return Err(InterpolateError::NotIncreasing(
                "breakpoints must be strictly increasing".to_string(),
            ));
        }

        let width = values[values.len() - 1] - values[0];
        let is_spacing_uniform = spacing
            .windows(2)
            .all(|s| (s[1] - s[0]).abs() <= 1e-12 * width);
        trace!(
            "{} intervals, uniform spacing: {}",
            spacing.len(),
            is_spacing_uniform
        );

        Ok(Breakpoints { values, is_spacing_uniform })
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn intervals(&self) -> usize {
        self.values.len() - 1
    }

    pub fn min(&self) -> f64 {
        self.values[0]
    }

    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn is_spacing_uniform(&self) -> bool {
        self.is_spacing_uniform
    }

    /// `x < min` or `x > max`. NaN is neither.
    pub fn is_out_of_range(&self, x: f64) -> bool {
        x < self.min() || x > self.max()
    }

    /// Index of the interval containing `x`. Points left of the domain map to the first
    /// interval and points right of it to the last one.
    pub fn find_interval(&self, x: f64) -> usize {
        if self.is_spacing_uniform {
            self.find_interval_uniform(x)
        } else {
            self.find_interval_bisect(x)
        }
    }

    /// Same as [Breakpoints::find_interval] but checks `hint` and the interval after it first,
    /// which makes sorted batches cheap.
    pub fn find_interval_with_hint(&self, hint: usize, x: f64) -> usize {
        let last = self.intervals() - 1;
        if hint <= last && self.is_in_interval(hint, x) {
            return hint;
        }
        if hint < last && self.is_in_interval(hint + 1, x) {
            return hint + 1;
        }
        self.find_interval(x)
    }

    fn is_in_interval(&self, interval: usize, x: f64) -> bool {
        let last = self.intervals() - 1;
        let lower = self.values[interval];
        let upper = self.values[interval + 1];
        if interval == last {
            lower <= x && x <= upper
        } else {
            lower <= x && x < upper
        }
    }

    fn find_interval_bisect(&self, x: f64) -> usize {
        let mut min = 0;
        let mut max = self.values.len() - 1;

        while max - min > 1 {
            let mid = (min + max) / 2;
            if x < self.values[mid] {
                max = mid;
            } else {
                min = mid;
            }
        }
        min
    }

    fn find_interval_uniform(&self, x: f64) -> usize {
        let last = self.intervals() - 1;
        let relative_x = (x - self.min()) / (self.max() - self.min());
        if !(relative_x > 0.0) {
            return 0;
        }
        let guess = (relative_x * self.intervals() as f64).floor();
        let mut index = if guess >= last as f64 { last } else { guess as usize };

        // the guess may be one off at a breakpoint due to rounding
        while index > 0 && x < self.values[index] {
            index -= 1;
        }
        while index < last && x >= self.values[index + 1] {
            index += 1;
        }
        index
    }
}
