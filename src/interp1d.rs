use std::str::FromStr;

use log::{debug, trace};
use ndarray::{arr0, Array, Array1, ArrayBase, ArrayD, Axis, Data, Dimension, IxDyn, Zip};
use num_complex::{Complex, Complex64};
use num_traits::ToPrimitive;

use crate::{
    breakpoints::Breakpoints,
    bspline::BSpline,
    error::{InterpolateError, Result},
    ppoly::{OutOfBounds, PPoly},
};

/// Interpolation method of an [Interp1d].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Straight line between the two bracketing samples.
    Linear,
    /// Value of the closest sample, ties go to the left one.
    Nearest,
    /// Value of the sample at or left of the query (zero-order hold).
    Zero,
    /// Interpolating spline of the given order (1 to 5).
    Spline(usize),
}

impl Kind {
    fn min_samples(&self) -> usize {
        match self {
            Kind::Linear | Kind::Nearest | Kind::Zero => 2,
            Kind::Spline(order) => order.saturating_add(1).max(2),
        }
    }
}

impl FromStr for Kind {
    type Err = InterpolateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Kind::Linear),
            "nearest" => Ok(Kind::Nearest),
            "zero" => Ok(Kind::Zero),
            "slinear" => Ok(Kind::Spline(1)),
            "quadratic" => Ok(Kind::Spline(2)),
            "cubic" => Ok(Kind::Spline(3)),
            other => Err(InterpolateError::InvalidKind(other.to_string())),
        }
    }
}

impl TryFrom<usize> for Kind {
    type Error = InterpolateError;

    /// Spline order; 0 is the zero-order hold.
    fn try_from(order: usize) -> Result<Self> {
        match order {
            0 => Ok(Kind::Zero),
            1..=5 => Ok(Kind::Spline(order)),
            _ => Err(InterpolateError::InvalidKind(format!(
                "spline order must be between 0 and 5, got {}",
                order
            ))),
        }
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Linear,
    Nearest,
    Zero,
    Spline(PPoly),
}

/// Options of an [Interp1d].
#[derive(Debug, Clone)]
pub struct Interp1dBuilder {
    kind: Kind,
    axis: isize,
    bounds_error: bool,
    fill_value: f64,
    copy: bool,
}

impl Default for Interp1dBuilder {
    fn default() -> Self {
        Interp1dBuilder {
            kind: Kind::Linear,
            axis: -1,
            bounds_error: true,
            fill_value: f64::NAN,
            copy: true,
        }
    }
}

impl Interp1dBuilder {
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Axis of `y` holding the samples; negative values count from the last axis.
    pub fn axis(mut self, axis: isize) -> Self {
        self.axis = axis;
        self
    }

    /// Whether queries outside of the sample range fail instead of taking the fill value.
    pub fn bounds_error(mut self, bounds_error: bool) -> Self {
        self.bounds_error = bounds_error;
        self
    }

    pub fn fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    /// Builds the interpolant. `x` and `y` may hold any numeric type; they are converted to
    /// `f64` and sorted by `x` without touching the caller's arrays.
    pub fn build<A, B, S1, S2, D1, D2>(
        self,
        x: &ArrayBase<S1, D1>,
        y: &ArrayBase<S2, D2>,
    ) -> Result<Interp1d>
    where
        A: ToPrimitive,
        B: ToPrimitive,
        S1: Data<Elem = A>,
        S2: Data<Elem = B>,
        D1: Dimension,
        D2: Dimension,
    {
        if let Kind::Spline(degree) = self.kind {
            if !(1..=5).contains(&degree) {
                return Err(InterpolateError::InvalidKind(format!(
                    "spline order must be between 1 and 5, got {}",
                    degree
                )));
            }
        }
        if x.ndim() != 1 {
            return Err(InterpolateError::Shape(format!(
                "x must be one-dimensional, got {} dimensions",
                x.ndim()
            )));
        }
        if y.ndim() == 0 {
            return Err(InterpolateError::Shape(
                "y must have at least one dimension".to_string(),
            ));
        }

        let ndim = y.ndim() as isize;
        let axis = if self.axis < 0 { self.axis + ndim } else { self.axis };
        if axis < 0 || axis >= ndim {
            return Err(InterpolateError::Shape(format!(
                "axis {} is out of range for y with {} dimensions",
                self.axis, ndim
            )));
        }
        let axis = axis as usize;

        let n = x.len();
        if y.shape()[axis] != n {
            return Err(InterpolateError::Shape(format!(
                "x has {} samples but y has {} along axis {}",
                n,
                y.shape()[axis],
                axis
            )));
        }
        let required = self.kind.min_samples();
        if n < required {
            return Err(InterpolateError::insufficient(
                required,
                n,
                &format!("{:?} interpolation", self.kind),
            ));
        }

        let unsorted = x.iter().map(to_f64).collect::<Result<Vec<f64>>>()?;
        if unsorted.iter().any(|v| v.is_nan()) {
            return Err(InterpolateError::NotIncreasing(
                "x must not contain NaN".to_string(),
            ));
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| unsorted[*a].total_cmp(&unsorted[*b]));
        let sorted: Vec<f64> = order.iter().map(|i| unsorted[*i]).collect();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(InterpolateError::NotIncreasing(
                "x must not contain duplicate values".to_string(),
            ));
        }
        let samples = Breakpoints::new(Array1::from(sorted))?;

        let values = y.iter().map(to_f64).collect::<Result<Vec<f64>>>()?;
        let values = ArrayD::from_shape_vec(IxDyn(y.shape()), values)?;
        let mut permutation: Vec<usize> = (0..y.ndim()).collect();
        permutation.remove(axis);
        permutation.insert(0, axis);
        let values = values
            .permuted_axes(IxDyn(&permutation))
            .select(Axis(0), &order);

        let backend = match self.kind {
            Kind::Linear => Backend::Linear,
            Kind::Nearest => Backend::Nearest,
            Kind::Zero => Backend::Zero,
            Kind::Spline(degree) => {
                let spline = BSpline::interpolate(samples.values(), &values, degree)?;
                Backend::Spline(
                    PPoly::from_spline(&spline, self.fill_value)?
                        .with_extrapolate(OutOfBounds::Extrapolate),
                )
            }
        };

        debug!(
            "{:?} interpolant over {} samples along axis {} of {:?}",
            self.kind,
            n,
            axis,
            y.shape()
        );

        Ok(Interp1d {
            samples,
            values,
            kind: self.kind,
            axis,
            bounds_error: self.bounds_error,
            fill_value: self.fill_value,
            copy: self.copy,
            backend,
        })
    }

    /// Builds an interpolant of complex samples from independent real and imaginary parts.
    /// Out-of-range entries become `fill_value + 0i`.
    pub fn build_complex<A, T, S1, S2, D1, D2>(
        self,
        x: &ArrayBase<S1, D1>,
        y: &ArrayBase<S2, D2>,
    ) -> Result<ComplexInterp1d>
    where
        A: ToPrimitive,
        T: ToPrimitive + Clone,
        S1: Data<Elem = A>,
        S2: Data<Elem = Complex<T>>,
        D1: Dimension,
        D2: Dimension,
    {
        let real = y.mapv(|c| c.re);
        let imag = y.mapv(|c| c.im);
        Ok(ComplexInterp1d {
            real: self.clone().build(x, &real)?,
            imag: self.fill_value(0.0).build(x, &imag)?,
        })
    }
}

fn to_f64<T: ToPrimitive>(value: &T) -> Result<f64> {
    value.to_f64().ok_or(InterpolateError::NotRepresentable)
}

/// One-dimensional interpolant of samples `y` over abscissas `x`, broadcast over the other
/// axes of `y`.
///
/// # Example
/// ```
/// use ndarray::array;
/// use piecewise_poly::{Interp1d, Kind};
///
/// let x = array![0.0, 1.0, 2.0, 3.0];
/// let y = array![0.0, 2.0, 4.0, 6.0];
/// let linear = Interp1d::new(&x, &y).unwrap();
/// assert_eq!(3.0, linear.evaluate_scalar(1.5).unwrap());
///
/// let nearest = Interp1d::builder().kind(Kind::Nearest).build(&x, &y).unwrap();
/// assert_eq!(4.0, nearest.evaluate_scalar(1.6).unwrap());
/// assert!(nearest.evaluate_scalar(3.5).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Interp1d {
    samples: Breakpoints,
    /// Samples with the interpolation axis first, sorted by `x`.
    values: ArrayD<f64>,
    kind: Kind,
    axis: usize,
    bounds_error: bool,
    fill_value: f64,
    copy: bool,
    backend: Backend,
}

impl Interp1d {
    pub fn builder() -> Interp1dBuilder {
        Interp1dBuilder::default()
    }

    /// Linear interpolant along the last axis of `y` that fails outside of the sample range.
    pub fn new<A, B, S1, S2, D1, D2>(x: &ArrayBase<S1, D1>, y: &ArrayBase<S2, D2>) -> Result<Self>
    where
        A: ToPrimitive,
        B: ToPrimitive,
        S1: Data<Elem = A>,
        S2: Data<Elem = B>,
        D1: Dimension,
        D2: Dimension,
    {
        Interp1dBuilder::default().build(x, y)
    }

    /// Sorted sample abscissas.
    pub fn x(&self) -> &Array1<f64> {
        self.samples.values()
    }

    /// Samples in the original axis order, sorted along the interpolation axis.
    pub fn y(&self) -> ArrayD<f64> {
        let mut permutation: Vec<usize> = (1..self.values.ndim()).collect();
        permutation.insert(self.axis, 0);
        self.values
            .view()
            .permuted_axes(IxDyn(&permutation))
            .as_standard_layout()
            .into_owned()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn bounds_error(&self) -> bool {
        self.bounds_error
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    pub fn copy(&self) -> bool {
        self.copy
    }

    fn trailing_shape(&self) -> &[usize] {
        &self.values.shape()[1..]
    }

    /// Marks the entries of `x_new` strictly outside of `[x.min(), x.max()]`.
    pub fn check_bounds<S, D>(&self, x_new: &ArrayBase<S, D>) -> Array<bool, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        x_new.mapv(|v| self.samples.is_out_of_range(v))
    }

    /// Interpolated values at `x_new`. The result is shaped like `y` with the interpolation
    /// axis replaced by the shape of `x_new`.
    pub fn evaluate<S, D>(&self, x_new: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let out_of_bounds = self.check_bounds(x_new);
        if self.bounds_error {
            let offending = x_new
                .iter()
                .zip(out_of_bounds.iter())
                .find(|(_, outside)| **outside);
            if let Some((point, _)) = offending {
                return Err(InterpolateError::OutOfDomain {
                    point: *point,
                    min: self.samples.min(),
                    max: self.samples.max(),
                });
            }
        }

        let mut flat = self.evaluate_unchecked(x_new)?;
        for (q, outside) in out_of_bounds.iter().enumerate() {
            if *outside {
                flat.index_axis_mut(Axis(0), q).fill(self.fill_value);
            }
        }
        trace!("{:?} interpolation at {} points", self.kind, x_new.len());
        self.arrange(flat, x_new.shape())
    }

    pub fn evaluate_point(&self, x: f64) -> Result<ArrayD<f64>> {
        self.evaluate(&arr0(x))
    }

    /// Interpolated value for one-dimensional `y`.
    pub fn evaluate_scalar(&self, x: f64) -> Result<f64> {
        if !self.trailing_shape().is_empty() {
            return Err(InterpolateError::Shape(format!(
                "scalar evaluation needs one-dimensional y, got trailing shape {:?}",
                self.trailing_shape()
            )));
        }
        self.evaluate_point(x)?
            .into_iter()
            .next()
            .ok_or_else(|| InterpolateError::Shape("empty evaluation result".to_string()))
    }

    /// Values shaped `(x_new.len(), *trailing)` with out-of-range points extended from the
    /// boundary samples or pieces.
    pub(crate) fn evaluate_unchecked<S, D>(&self, x_new: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let table = match &self.backend {
            Backend::Spline(table) => table,
            Backend::Linear => return Ok(self.evaluate_linear(x_new)),
            Backend::Nearest => return Ok(self.evaluate_nearest(x_new)),
            Backend::Zero => return Ok(self.evaluate_zero(x_new)),
        };
        let flat: Array1<f64> = x_new.iter().copied().collect();
        table.evaluate_with(&flat, 0, OutOfBounds::Extrapolate)
    }

    fn evaluate_linear<S, D>(&self, x_new: &ArrayBase<S, D>) -> ArrayD<f64>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let x = self.samples.values();
        let mut out = self.empty_output(x_new.len());
        let mut interval = 0;
        for (q, &xp) in x_new.iter().enumerate() {
            interval = self.samples.find_interval_with_hint(interval, xp);
            let slope_position = (xp - x[interval]) / (x[interval + 1] - x[interval]);
            let lower = self.values.index_axis(Axis(0), interval);
            let upper = self.values.index_axis(Axis(0), interval + 1);
            Zip::from(out.index_axis_mut(Axis(0), q))
                .and(&lower)
                .and(&upper)
                .for_each(|o, &lo, &hi| *o = lo + (hi - lo) * slope_position);
        }
        out
    }

    fn evaluate_nearest<S, D>(&self, x_new: &ArrayBase<S, D>) -> ArrayD<f64>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let x = self.samples.values();
        let indices = x_new.iter().map(|&xp| {
            if xp.is_nan() {
                return None;
            }
            let interval = self.samples.find_interval(xp);
            let midpoint = 0.5 * (x[interval] + x[interval + 1]);
            if xp > midpoint {
                Some(interval + 1)
            } else {
                Some(interval)
            }
        });
        self.take_samples(indices, x_new.len())
    }

    /// The last sample maps to itself rather than to the interval on its left.
    fn evaluate_zero<S, D>(&self, x_new: &ArrayBase<S, D>) -> ArrayD<f64>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let last = self.samples.len() - 1;
        let indices = x_new.iter().map(|&xp| {
            if xp.is_nan() {
                None
            } else if xp >= self.samples.max() {
                Some(last)
            } else {
                Some(self.samples.find_interval(xp))
            }
        });
        self.take_samples(indices, x_new.len())
    }

    /// Copies sample rows into the output; `None` marks a NaN query.
    fn take_samples(&self, indices: impl Iterator<Item = Option<usize>>, len: usize) -> ArrayD<f64> {
        let mut out = self.empty_output(len);
        for (q, index) in indices.enumerate() {
            let mut row = out.index_axis_mut(Axis(0), q);
            match index {
                Some(index) => row.assign(&self.values.index_axis(Axis(0), index)),
                None => row.fill(f64::NAN),
            }
        }
        out
    }

    fn empty_output(&self, len: usize) -> ArrayD<f64> {
        let mut shape = vec![len];
        shape.extend_from_slice(self.trailing_shape());
        ArrayD::zeros(IxDyn(&shape))
    }

    /// Reshapes `(n, *trailing)` values so the query shape sits at the interpolation axis.
    fn arrange(&self, flat: ArrayD<f64>, query_shape: &[usize]) -> Result<ArrayD<f64>> {
        let query_ndim = query_shape.len();
        let trailing_ndim = self.trailing_shape().len();

        let mut shape = query_shape.to_vec();
        shape.extend_from_slice(self.trailing_shape());
        let values = flat.into_shape_with_order(IxDyn(&shape))?;

        let permutation: Vec<usize> = (query_ndim..query_ndim + self.axis)
            .chain(0..query_ndim)
            .chain(query_ndim + self.axis..query_ndim + trailing_ndim)
            .collect();
        Ok(values
            .permuted_axes(IxDyn(&permutation))
            .as_standard_layout()
            .into_owned())
    }
}

/// Interpolant of complex samples, built with [Interp1dBuilder::build_complex].
#[derive(Debug, Clone)]
pub struct ComplexInterp1d {
    real: Interp1d,
    imag: Interp1d,
}

impl ComplexInterp1d {
    pub fn real(&self) -> &Interp1d {
        &self.real
    }

    pub fn imag(&self) -> &Interp1d {
        &self.imag
    }

    pub fn evaluate<S, D>(&self, x_new: &ArrayBase<S, D>) -> Result<ArrayD<Complex64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let real = self.real.evaluate(x_new)?;
        let imag = self.imag.evaluate(x_new)?;
        Ok(Zip::from(&real)
            .and(&imag)
            .map_collect(|&re, &im| Complex64::new(re, im)))
    }
}
