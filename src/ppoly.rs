use log::{debug, trace};
use ndarray::{arr0, Array1, ArrayBase, ArrayD, ArrayViewMutD, Axis, Data, Dimension, IxDyn, Zip};

use crate::{
    breakpoints::Breakpoints,
    error::{InterpolateError, Result},
    polynomial::falling_factorial,
};

/// What happens to query points outside of `[breakpoints[0], breakpoints[m]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfBounds {
    /// Write the table's fill value.
    #[default]
    Fill,
    /// Evaluate the first or last piece beyond its interval.
    Extrapolate,
    /// Fail with [InterpolateError::OutOfDomain].
    Error,
}

/// Piecewise polynomial in the power basis.
///
/// `coefficients[i, j, ...]` multiplies `(x - breakpoints[j])^(order - i)` on interval `j`.
/// Any axes after the second are trailing batch axes: every slice along them is an
/// independent piecewise polynomial sharing the same breakpoints.
///
/// # Example
/// ```
/// use ndarray::array;
/// use piecewise_poly::PPoly;
///
/// let coefficients = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
/// let pp = PPoly::new(coefficients, array![0.0, 0.5, 1.0]).unwrap();
///
/// let value = pp.evaluate_scalar(0.3, 0).unwrap();
/// assert!((value - (0.3 * 0.3 + 2.0 * 0.3 + 3.0)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PPoly {
    breakpoints: Breakpoints,
    coefficients: ArrayD<f64>,
    trailing_shape: Vec<usize>,
    fill_value: f64,
    extrapolate: OutOfBounds,
}

impl PPoly {
    /// Builds a table from `coefficients` shaped `(order + 1, m, *trailing)` and `m + 1`
    /// strictly increasing breakpoints. Out-of-range points are filled with NaN.
    pub fn new<S, D>(coefficients: ArrayBase<S, D>, breakpoints: Array1<f64>) -> Result<Self>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if coefficients.ndim() < 2 {
            return Err(InterpolateError::Shape(format!(
                "coefficients need at least 2 dimensions, got {}",
                coefficients.ndim()
            )));
        }
        if coefficients.shape()[0] == 0 {
            return Err(InterpolateError::Shape(
                "coefficients need at least one polynomial term".to_string(),
            ));
        }

        let breakpoints = Breakpoints::new(breakpoints)?;
        if coefficients.shape()[1] != breakpoints.intervals() {
            return Err(InterpolateError::Shape(format!(
                "coefficients describe {} intervals but breakpoints define {}",
                coefficients.shape()[1],
                breakpoints.intervals()
            )));
        }

        let coefficients = coefficients.to_owned().into_dyn();
        let pp = Self::from_parts(breakpoints, coefficients, f64::NAN, OutOfBounds::Fill);
        debug!(
            "piecewise polynomial of order {} on {} intervals, trailing shape {:?}",
            pp.order(),
            pp.intervals(),
            pp.trailing_shape
        );
        Ok(pp)
    }

    pub(crate) fn from_parts(
        breakpoints: Breakpoints,
        coefficients: ArrayD<f64>,
        fill_value: f64,
        extrapolate: OutOfBounds,
    ) -> Self {
        let trailing_shape = coefficients.shape()[2..].to_vec();
        PPoly {
            breakpoints,
            coefficients,
            trailing_shape,
            fill_value,
            extrapolate,
        }
    }

    pub fn with_fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Sets the policy used by [PPoly::evaluate].
    pub fn with_extrapolate(mut self, extrapolate: OutOfBounds) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    pub fn breakpoints(&self) -> &Array1<f64> {
        self.breakpoints.values()
    }

    pub(crate) fn partition(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Coefficients shaped `(order + 1, m, *trailing)`.
    pub fn coefficients(&self) -> &ArrayD<f64> {
        &self.coefficients
    }

    pub fn order(&self) -> usize {
        self.coefficients.shape()[0] - 1
    }

    pub fn intervals(&self) -> usize {
        self.breakpoints.intervals()
    }

    pub fn trailing_shape(&self) -> &[usize] {
        &self.trailing_shape
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    pub fn extrapolate(&self) -> OutOfBounds {
        self.extrapolate
    }

    /// Evaluates the `nu`-th derivative at every element of `x` using the table's own
    /// out-of-bounds policy. The result has shape `x.shape() + trailing_shape`.
    pub fn evaluate<S, D>(&self, x: &ArrayBase<S, D>, nu: usize) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.evaluate_with(x, nu, self.extrapolate)
    }

    pub fn evaluate_with<S, D>(
        &self,
        x: &ArrayBase<S, D>,
        nu: usize,
        policy: OutOfBounds,
    ) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let mut flat_shape = vec![x.len()];
        flat_shape.extend_from_slice(&self.trailing_shape);
        let mut out = ArrayD::<f64>::zeros(IxDyn(&flat_shape));

        let mut interval = 0;
        for (q, &xp) in x.iter().enumerate() {
            let mut row = out.index_axis_mut(Axis(0), q);
            if self.breakpoints.is_out_of_range(xp) {
                match policy {
                    OutOfBounds::Fill => {
                        row.fill(self.fill_value);
                        continue;
                    }
                    OutOfBounds::Error => {
                        return Err(InterpolateError::OutOfDomain {
                            point: xp,
                            min: self.breakpoints.min(),
                            max: self.breakpoints.max(),
                        })
                    }
                    OutOfBounds::Extrapolate => {}
                }
            }
            interval = self.breakpoints.find_interval_with_hint(interval, xp);
            let d = xp - self.breakpoints.values()[interval];
            evaluate_piece(&self.coefficients, interval, d, nu, row);
        }
        trace!("evaluated derivative {} at {} points", nu, x.len());

        let mut shape = x.shape().to_vec();
        shape.extend_from_slice(&self.trailing_shape);
        Ok(out.into_shape_with_order(IxDyn(&shape))?)
    }

    /// Evaluates at a single point. The result has the trailing shape.
    pub fn evaluate_point(&self, x: f64, nu: usize) -> Result<ArrayD<f64>> {
        self.evaluate(&arr0(x), nu)
    }

    /// Evaluates a table without trailing dimensions at a single point.
    pub fn evaluate_scalar(&self, x: f64, nu: usize) -> Result<f64> {
        if !self.trailing_shape.is_empty() {
            return Err(InterpolateError::Shape(format!(
                "scalar evaluation needs a table without trailing dimensions, got {:?}",
                self.trailing_shape
            )));
        }
        self.evaluate_point(x, nu)?
            .into_iter()
            .next()
            .ok_or_else(|| InterpolateError::Shape("empty evaluation result".to_string()))
    }
}

/// Horner evaluation of the `nu`-th derivative of piece `interval` at local coordinate `d`,
/// written into `out` (shaped like the trailing dimensions).
pub(crate) fn evaluate_piece(
    coefficients: &ArrayD<f64>,
    interval: usize,
    d: f64,
    nu: usize,
    mut out: ArrayViewMutD<f64>,
) {
    let order = coefficients.shape()[0] - 1;
    out.fill(0.0);
    if nu > order {
        return;
    }
    for i in 0..=order - nu {
        let scale = falling_factorial(order - i, nu);
        let c = coefficients
            .index_axis(Axis(0), i)
            .index_axis_move(Axis(0), interval);
        Zip::from(&mut out)
            .and(&c)
            .for_each(|acc, &c| *acc = *acc * d + c * scale);
    }
}
