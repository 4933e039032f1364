use ndarray::{s, Array1};

use crate::error::{InterpolateError, Result};

/// Knot sequence of a B-spline of a given degree.
///
/// The first and last `degree + 1` knots coincide, interior knots may repeat at most
/// `degree` times. The spline lives on the base interval `[t[degree], t[n]]` where `n` is
/// the number of coefficients.
#[derive(Debug, Clone)]
pub struct KnotVector {
    values: Array1<f64>,
    degree: usize,
}

impl KnotVector {
    /// Validates `values` as the knots of a spline with `number_of_coefficients` coefficients.
    pub fn new(values: Array1<f64>, degree: usize, number_of_coefficients: usize) -> Result<Self> {
        let malformed =
            |message: String| -> Result<Self> { Err(InterpolateError::MalformedSpline(message)) };

        if number_of_coefficients < degree + 1 {
            return malformed(format!(
                "a spline of degree {} needs at least {} coefficients, got {}",
                degree,
                degree + 1,
                number_of_coefficients
            ));
        }
        if values.len() != number_of_coefficients + degree + 1 {
            return malformed(format!(
                "expected {} knots for {} coefficients of degree {}, got {}",
                number_of_coefficients + degree + 1,
                number_of_coefficients,
                degree,
                values.len()
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return malformed("knots must be finite".to_string());
        }
        if values.windows(2).into_iter().any(|w| w[1] < w[0]) {
            return malformed("knots must be non-decreasing".to_string());
        }

        let last = values.len() - 1;
        if values[degree] != values[0] || values[last - degree] != values[last] {
            return malformed(format!(
                "boundary knots must be repeated {} times",
                degree + 1
            ));
        }
        if values[degree] >= values[number_of_coefficients] {
            return malformed("base interval is empty".to_string());
        }

        let interior = values.slice(s![degree + 1..number_of_coefficients]);
        let max_multiplicity = degree.max(1);
        let mut run = 1;
        for w in interior.windows(2).into_iter() {
            run = if w[1] == w[0] { run + 1 } else { 1 };
            if run > max_multiplicity {
                return malformed(format!(
                    "interior knot {} repeats more than {} times",
                    w[0], max_multiplicity
                ));
            }
        }

        Ok(KnotVector { values, degree })
    }

    /// Unchecked constructor for knots derived from an already valid vector.
    pub(crate) fn from_raw(values: Array1<f64>, degree: usize) -> Self {
        KnotVector { values, degree }
    }

    /// Knots of the interpolating spline through the abscissas `x` with zero smoothing.
    ///
    /// Boundary knots sit on the first and last sample. For odd degree the interior knots
    /// are interior samples, for even degree they are midpoints between samples.
    pub fn interpolating(x: &Array1<f64>, degree: usize) -> Result<Self> {
        let m = x.len();
        if m < degree + 1 {
            return Err(InterpolateError::insufficient(
                degree + 1,
                m,
                "spline interpolation",
            ));
        }

        let mut values = Vec::with_capacity(m + degree + 1);
        values.extend(std::iter::repeat(x[0]).take(degree + 1));
        if degree % 2 == 1 {
            let half = (degree + 1) / 2;
            values.extend(x.slice(s![half..m - half]).iter().copied());
        } else {
            let half = degree / 2;
            values.extend((half + 1..m - half).map(|j| 0.5 * (x[j - 1] + x[j])));
        }
        values.extend(std::iter::repeat(x[m - 1]).take(degree + 1));

        KnotVector::new(Array1::from(values), degree, m)
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn number_of_coefficients(&self) -> usize {
        self.values.len() - self.degree - 1
    }

    pub fn base_interval(&self) -> (f64, f64) {
        (
            self.values[self.degree],
            self.values[self.number_of_coefficients()],
        )
    }

    /// Distinct knots inside the base interval, i.e. the breakpoints of the spline.
    pub fn breakpoints(&self) -> Array1<f64> {
        let mut breakpoints: Vec<f64> = Vec::new();
        for &v in self
            .values
            .slice(s![self.degree..=self.number_of_coefficients()])
            .iter()
        {
            if breakpoints.last() != Some(&v) {
                breakpoints.push(v);
            }
        }
        Array1::from(breakpoints)
    }

    /// Index `l` of the knot span `t[l] <= x < t[l+1]` inside the base interval. The last
    /// span is closed; points outside of the base interval map to the first or last span.
    pub fn find_span(&self, x: f64) -> usize {
        let mut min = self.degree;
        let mut max = self.number_of_coefficients();

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
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn valid_knots() {
        let knots = KnotVector::new(array![0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0], 2, 5).unwrap();
        assert_eq!(2, knots.degree());
        assert_eq!(5, knots.number_of_coefficients());
        assert_eq!((0.0, 1.0), knots.base_interval());
        assert_eq!(array![0.0, 0.5, 1.0], knots.breakpoints());
    }

    #[test]
    fn malformed_knots() {
        // wrong length
        assert!(KnotVector::new(array![0.0, 0.0, 1.0, 1.0], 1, 3).is_err());
        // too few coefficients
        assert!(KnotVector::new(array![0.0, 0.0, 1.0, 1.0], 2, 1).is_err());
        // decreasing
        assert!(KnotVector::new(array![0.0, 0.0, 0.7, 0.3, 1.0, 1.0], 1, 4).is_err());
        // boundary multiplicity
        assert!(KnotVector::new(array![0.0, 0.1, 0.5, 1.0, 1.0, 1.0], 2, 3).is_err());
        // interior multiplicity above degree
        assert!(KnotVector::new(array![0.0, 0.0, 0.5, 0.5, 1.0, 1.0], 1, 4).is_err());
        // non-finite
        assert!(KnotVector::new(array![0.0, 0.0, f64::NAN, 1.0, 1.0], 1, 3).is_err());
    }

    #[test]
    fn interpolating_knots() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

        let cubic = KnotVector::interpolating(&x, 3).unwrap();
        assert_eq!(
            array![0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 5.0, 5.0, 5.0, 5.0],
            *cubic.values()
        );

        let quadratic = KnotVector::interpolating(&x, 2).unwrap();
        assert_eq!(
            array![0.0, 0.0, 0.0, 1.5, 2.5, 3.5, 5.0, 5.0, 5.0],
            *quadratic.values()
        );

        let linear = KnotVector::interpolating(&x, 1).unwrap();
        assert_eq!(
            array![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0],
            *linear.values()
        );

        assert!(KnotVector::interpolating(&array![0.0, 1.0, 2.0], 3).is_err());
    }

    #[test]
    fn spans() {
        let knots = KnotVector::new(array![0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0], 2, 5).unwrap();
        assert_eq!(2, knots.find_span(-1.0));
        assert_eq!(2, knots.find_span(0.0));
        assert_eq!(2, knots.find_span(0.49));
        assert_eq!(4, knots.find_span(0.5));
        assert_eq!(4, knots.find_span(1.0));
        assert_eq!(4, knots.find_span(2.0));
    }
}
