use std::str::FromStr;

use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};

use crate::{
    error::{InterpolateError, Result},
    interp1d::{Interp1d, Interp1dBuilder, Kind},
};

/// Spline order used along both axes of an [Interp2d].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridKind {
    #[default]
    Linear,
    Cubic,
    Quintic,
}

impl GridKind {
    fn order(&self) -> usize {
        match self {
            GridKind::Linear => 1,
            GridKind::Cubic => 3,
            GridKind::Quintic => 5,
        }
    }
}

impl FromStr for GridKind {
    type Err = InterpolateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(GridKind::Linear),
            "cubic" => Ok(GridKind::Cubic),
            "quintic" => Ok(GridKind::Quintic),
            other => Err(InterpolateError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interp2dBuilder {
    kind: GridKind,
    bounds_error: bool,
    fill_value: Option<f64>,
}

impl Interp2dBuilder {
    pub fn kind(mut self, kind: GridKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn bounds_error(mut self, bounds_error: bool) -> Self {
        self.bounds_error = bounds_error;
        self
    }

    /// Value of grid points outside of the sample rectangle. Without one they are
    /// extrapolated from the boundary pieces.
    pub fn fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Builds the surface through `z[[j, i]]` sampled at `(x[i], y[j])`.
    pub fn build<S1, S2, S3>(
        self,
        x: &ArrayBase<S1, Ix1>,
        y: &ArrayBase<S2, Ix1>,
        z: &ArrayBase<S3, Ix2>,
    ) -> Result<Interp2d>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
    {
        if z.shape() != [y.len(), x.len()] {
            return Err(InterpolateError::Shape(format!(
                "z must have shape ({}, {}), got {:?}",
                y.len(),
                x.len(),
                z.shape()
            )));
        }

        let along_x = self.line_builder().axis(1).build(x, z)?;
        let y_line = self.line_builder().build(y, y)?;

        debug!(
            "{:?} surface over a {}x{} grid",
            self.kind,
            x.len(),
            y.len()
        );

        Ok(Interp2d {
            along_x,
            y: y_line.x().clone(),
            y_unsorted: y.to_owned(),
            kind: self.kind,
            bounds_error: self.bounds_error,
            fill_value: self.fill_value,
        })
    }

    fn line_builder(&self) -> Interp1dBuilder {
        Interp1d::builder()
            .kind(Kind::Spline(self.kind.order()))
            .bounds_error(false)
    }
}

/// Tensor-product interpolant over a rectangular grid: a spline along `x` followed by a spline
/// along `y` through the intermediate values.
///
/// # Example
/// ```
/// use ndarray::{array, Array2};
/// use piecewise_poly::Interp2d;
///
/// let x = array![0.0, 1.0, 2.0];
/// let y = array![0.0, 1.0];
/// let z = Array2::from_shape_fn((2, 3), |(j, i)| x[i] + 10.0 * y[j]);
/// let surface = Interp2d::builder().build(&x, &y, &z).unwrap();
///
/// let values = surface.evaluate(&array![0.5, 1.5], &array![0.5]).unwrap();
/// assert_eq!(&[1, 2], values.shape());
/// assert!((values[[0, 0]] - 5.5).abs() < 1e-12);
/// assert!((values[[0, 1]] - 6.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Interp2d {
    along_x: Interp1d,
    /// Sorted y abscissas.
    y: Array1<f64>,
    /// Rows of the intermediate values follow the order of `y` as given.
    y_unsorted: Array1<f64>,
    kind: GridKind,
    bounds_error: bool,
    fill_value: Option<f64>,
}

impl Interp2d {
    pub fn builder() -> Interp2dBuilder {
        Interp2dBuilder::default()
    }

    pub fn x(&self) -> &Array1<f64> {
        self.along_x.x()
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Values on the grid spanned by `xi` and `yi`, shaped `(yi.len(), xi.len())`.
    pub fn evaluate<S1, S2>(
        &self,
        xi: &ArrayBase<S1, Ix1>,
        yi: &ArrayBase<S2, Ix1>,
    ) -> Result<Array2<f64>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let (x_min, x_max) = (self.x()[0], self.x()[self.x().len() - 1]);
        let (y_min, y_max) = (self.y[0], self.y[self.y.len() - 1]);
        let column_outside = xi.mapv(|v| v < x_min || v > x_max);
        let row_outside = yi.mapv(|v| v < y_min || v > y_max);

        if self.bounds_error {
            let offending = xi
                .iter()
                .zip(column_outside.iter())
                .map(|(v, outside)| (*v, *outside, x_min, x_max))
                .chain(
                    yi.iter()
                        .zip(row_outside.iter())
                        .map(|(v, outside)| (*v, *outside, y_min, y_max)),
                )
                .find(|(_, outside, _, _)| *outside);
            if let Some((point, _, min, max)) = offending {
                return Err(InterpolateError::OutOfDomain { point, min, max });
            }
        }

        // (xi.len(), ny) with rows of z in their given order
        let columns = self.along_x.evaluate_unchecked(xi)?;
        let along_y = Interp1d::builder()
            .kind(Kind::Spline(self.kind.order()))
            .bounds_error(false)
            .axis(0)
            .build(&self.y_unsorted, &columns.t())?;
        let mut values = along_y
            .evaluate_unchecked(yi)?
            .into_shape_with_order((yi.len(), xi.len()))?;

        if let Some(fill_value) = self.fill_value {
            for (mut row, outside) in values.axis_iter_mut(Axis(0)).zip(row_outside.iter()) {
                if *outside {
                    row.fill(fill_value);
                }
            }
            for (mut column, outside) in values.axis_iter_mut(Axis(1)).zip(column_outside.iter()) {
                if *outside {
                    column.fill(fill_value);
                }
            }
        }

        trace!("surface evaluated on a {}x{} grid", xi.len(), yi.len());
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{array, Array1, Array2};
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use super::*;

    fn single(surface: &Interp2d, x: f64, y: f64) -> f64 {
        surface.evaluate(&array![x], &array![y]).unwrap()[[0, 0]]
    }

    #[test]
    fn smooth_surface() {
        let x = Array1::linspace(0.0, PI, 21);
        let y = Array1::linspace(0.0, 2.0, 20);
        let z = Array2::from_shape_fn((20, 21), |(j, i)| (x[i] + 0.5 * y[j]).sin());
        let surface = Interp2d::builder().build(&x, &y, &z).unwrap();
        assert_approx_eq!(2.0f64.sin(), single(&surface, 1.0, 2.0), 1.5e-2);

        let u = Array1::linspace(0.0, PI, 25);
        let v = Array1::linspace(0.0, 2.0, 24);
        let expected = Array2::from_shape_fn((24, 25), |(j, i)| (u[i] + 0.5 * v[j]).sin());
        assert_abs_diff_eq!(surface.evaluate(&u, &v).unwrap(), expected, epsilon = 1.5e-2);
    }

    #[test]
    fn grid_input() {
        let x = Array1::linspace(0.0, 2.0, 16);
        let y = Array1::linspace(0.0, PI, 21);
        let z = Array2::from_shape_fn((21, 16), |(j, i)| (x[i] + y[j] / 2.0).sin());
        let surface = Interp2d::builder().build(&x, &y, &z).unwrap();
        assert_approx_eq!(2.0f64.sin(), single(&surface, 1.0, 2.0), 1.5e-2);
    }

    #[test]
    fn unsorted_grid() {
        let mut rng = StdRng::seed_from_u64(1234);
        let surface_of = |x: &Array1<f64>, y: &Array1<f64>| {
            let z = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| (x[i] + y[j] / 2.0).sin());
            Interp2d::builder()
                .kind(GridKind::Cubic)
                .build(x, y, &z)
                .unwrap()
        };

        let mut x = Array1::linspace(0.0, 2.0, 16).to_vec();
        let mut y = Array1::linspace(0.0, PI, 21).to_vec();
        let sorted = surface_of(&Array1::from(x.clone()), &Array1::from(y.clone()));

        x.shuffle(&mut rng);
        let shuffled_x = surface_of(&Array1::from(x.clone()), &Array1::from(y.clone()));

        x.shuffle(&mut rng);
        y.shuffle(&mut rng);
        let shuffled_both = surface_of(&Array1::from(x), &Array1::from(y));

        let xi = Array1::linspace(0.0, 2.0, 31);
        let yi = Array1::linspace(0.0, PI, 30);
        let expected = sorted.evaluate(&xi, &yi).unwrap();
        assert_eq!(expected, shuffled_x.evaluate(&xi, &yi).unwrap());
        assert_eq!(expected, shuffled_both.evaluate(&xi, &yi).unwrap());
    }

    #[test]
    fn linear_peak() {
        let mut a = Array2::zeros((5, 5));
        a[[2, 2]] = 1.0;
        let x = Array1::range(0.0, 5.0, 1.0);
        let surface = Interp2d::builder()
            .kind("linear".parse().unwrap())
            .build(&x, &x, &a)
            .unwrap();
        assert_approx_eq!(0.5, single(&surface, 2.0, 1.5), 1e-12);
        assert_approx_eq!(0.5, single(&surface, 2.0, 2.5), 1e-12);
    }

    #[test]
    fn bounds() {
        let x = Array1::linspace(0.0, 1.0, 5);
        let y = Array1::linspace(0.0, 2.0, 7);
        let z = Array2::from_shape_fn((7, 5), |(j, i)| x[i] * x[i] + y[j]);
        let ix = Array1::linspace(-1.0, 3.0, 31);
        let iy = Array1::linspace(-1.0, 3.0, 33);

        let strict = Interp2d::builder().bounds_error(true).build(&x, &y, &z).unwrap();
        assert!(matches!(
            strict.evaluate(&ix, &iy),
            Err(InterpolateError::OutOfDomain { .. })
        ));

        let filled = Interp2d::builder()
            .fill_value(f64::NAN)
            .build(&x, &y, &z)
            .unwrap();
        let iz = filled.evaluate(&ix, &iy).unwrap();
        assert_eq!(&[33, 31], iz.shape());
        for (j, &yv) in iy.iter().enumerate() {
            for (i, &xv) in ix.iter().enumerate() {
                let outside = !(0.0..=1.0).contains(&xv) || !(0.0..=2.0).contains(&yv);
                assert_eq!(outside, iz[[j, i]].is_nan(), "({}, {})", xv, yv);
            }
        }

        let extrapolated = Interp2d::builder().build(&x, &y, &z).unwrap();
        assert!(extrapolated.evaluate(&ix, &iy).unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn validation() {
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, 1.0];
        assert!(matches!(
            Interp2d::builder().build(&x, &y, &Array2::zeros((3, 2))),
            Err(InterpolateError::Shape(_))
        ));
        assert!(matches!(
            Interp2d::builder()
                .kind(GridKind::Cubic)
                .build(&x, &y, &Array2::zeros((2, 3))),
            Err(InterpolateError::InsufficientData { .. })
        ));
        assert!("bilinear".parse::<GridKind>().is_err());
    }
}
