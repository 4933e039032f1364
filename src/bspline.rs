use log::debug;
use nalgebra::DMatrix;
use ndarray::{s, Array1, ArrayBase, ArrayD, Axis, Data, Dimension, IxDyn, Zip};

use crate::{
    error::{InterpolateError, Result},
    knot::KnotVector,
    polynomial::factorial,
    ppoly::PPoly,
};

/// B-spline in the knots / coefficients / degree representation.
///
/// `coefficients` is shaped `(n, *trailing)`; every slice along the trailing axes is an
/// independent scalar spline on the shared knots.
#[derive(Debug, Clone)]
pub struct BSpline {
    knots: KnotVector,
    coefficients: ArrayD<f64>,
}

impl BSpline {
    pub fn new<S, D>(knots: Array1<f64>, coefficients: ArrayBase<S, D>, degree: usize) -> Result<Self>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if coefficients.ndim() == 0 {
            return Err(InterpolateError::MalformedSpline(
                "coefficients must have at least one dimension".to_string(),
            ));
        }
        let knots = KnotVector::new(knots, degree, coefficients.shape()[0])?;
        Ok(BSpline {
            knots,
            coefficients: coefficients.to_owned().into_dyn(),
        })
    }

    /// Interpolating spline of `degree` through `(x[i], y[i, ...])` with zero smoothing.
    ///
    /// `x` must be strictly increasing; `y` holds the samples along its first axis.
    pub fn interpolate<S, D>(x: &Array1<f64>, y: &ArrayBase<S, D>, degree: usize) -> Result<Self>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if y.ndim() == 0 || y.shape()[0] != x.len() {
            return Err(InterpolateError::Shape(format!(
                "expected {} samples along the first axis of y, got shape {:?}",
                x.len(),
                y.shape()
            )));
        }
        if x.windows(2).into_iter().any(|w| w[1] <= w[0]) {
            return Err(InterpolateError::NotIncreasing(
                "sample abscissas must be strictly increasing".to_string(),
            ));
        }

        let knots = KnotVector::interpolating(x, degree)?;
        let m = x.len();
        let batch: usize = y.shape()[1..].iter().product();

        let mut matrix = DMatrix::<f64>::zeros(m, m);
        for (i, &xi) in x.iter().enumerate() {
            let span = knots.find_span(xi);
            let basis = basis_functions(knots.values(), degree, span, xi);
            for (r, value) in basis.iter().enumerate() {
                matrix[(i, span - degree + r)] = *value;
            }
        }

        let samples: Vec<f64> = y.iter().copied().collect();
        let rhs = DMatrix::<f64>::from_fn(m, batch, |i, t| samples[i * batch + t]);

        let solution = match matrix.lu().solve(&rhs) {
            Some(solution) => solution,
            None => {
                return Err(InterpolateError::Singular(
                    "collocation matrix of the interpolating spline".to_string(),
                ))
            }
        };

        let mut coefficients = Vec::with_capacity(m * batch);
        for i in 0..m {
            for t in 0..batch {
                coefficients.push(solution[(i, t)]);
            }
        }
        let coefficients = ArrayD::from_shape_vec(IxDyn(y.shape()), coefficients)?;
        debug!(
            "interpolating spline of degree {} through {} samples, batch of {}",
            degree, m, batch
        );

        Ok(BSpline { knots, coefficients })
    }

    pub fn knots(&self) -> &Array1<f64> {
        self.knots.values()
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn coefficients(&self) -> &ArrayD<f64> {
        &self.coefficients
    }

    pub fn trailing_shape(&self) -> &[usize] {
        &self.coefficients.shape()[1..]
    }

    pub fn base_interval(&self) -> (f64, f64) {
        self.knots.base_interval()
    }

    /// Evaluates the `nu`-th derivative at every element of `x`; the result has shape
    /// `x.shape() + trailing_shape`. Points outside of the base interval are evaluated on the
    /// boundary polynomials.
    pub fn evaluate<S, D>(&self, x: &ArrayBase<S, D>, nu: usize) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let mut shape = x.shape().to_vec();
        shape.extend_from_slice(self.trailing_shape());

        if nu > self.degree() {
            return Ok(ArrayD::zeros(IxDyn(&shape)));
        }
        if nu > 0 {
            return self.derivative(nu)?.evaluate(x, 0);
        }

        let degree = self.degree();
        let mut flat_shape = vec![x.len()];
        flat_shape.extend_from_slice(self.trailing_shape());
        let mut out = ArrayD::<f64>::zeros(IxDyn(&flat_shape));

        for (q, &xp) in x.iter().enumerate() {
            let span = self.knots.find_span(xp);
            let basis = basis_functions(self.knots.values(), degree, span, xp);
            let mut row = out.index_axis_mut(Axis(0), q);
            for (r, weight) in basis.iter().enumerate() {
                let c = self.coefficients.index_axis(Axis(0), span - degree + r);
                Zip::from(&mut row)
                    .and(&c)
                    .for_each(|acc, &c| *acc += weight * c);
            }
        }
        Ok(out.into_shape_with_order(IxDyn(&shape))?)
    }

    /// `nu`-th derivative as a spline of degree `degree - nu`.
    pub fn derivative(&self, nu: usize) -> Result<BSpline> {
        if nu > self.degree() {
            return Err(InterpolateError::MalformedSpline(format!(
                "derivative order {} exceeds degree {}",
                nu,
                self.degree()
            )));
        }

        let mut knots = self.knots.values().clone();
        let mut coefficients = self.coefficients.clone();
        let mut degree = self.degree();

        for _ in 0..nu {
            let n = coefficients.shape()[0];
            let mut shape = coefficients.shape().to_vec();
            shape[0] = n - 1;
            let mut derived = ArrayD::<f64>::zeros(IxDyn(&shape));
            for i in 0..n - 1 {
                let width = knots[i + degree + 1] - knots[i + 1];
                if width > 0.0 {
                    let difference =
                        &coefficients.index_axis(Axis(0), i + 1) - &coefficients.index_axis(Axis(0), i);
                    derived
                        .index_axis_mut(Axis(0), i)
                        .assign(&(difference * (degree as f64 / width)));
                }
            }
            knots = knots.slice(s![1..knots.len() - 1]).to_owned();
            coefficients = derived;
            degree -= 1;
        }

        Ok(BSpline {
            knots: KnotVector::from_raw(knots, degree),
            coefficients,
        })
    }

    /// `nu`-th antiderivative as a spline of degree `degree + nu`, vanishing at the left end
    /// of the base interval.
    pub fn antiderivative(&self, nu: usize) -> BSpline {
        let mut knots = self.knots.values().clone();
        let mut coefficients = self.coefficients.clone();
        let mut degree = self.degree();

        for _ in 0..nu {
            let n = coefficients.shape()[0];
            let mut shape = coefficients.shape().to_vec();
            shape[0] = n + 1;
            let mut integrated = ArrayD::<f64>::zeros(IxDyn(&shape));

            let mut running = ArrayD::<f64>::zeros(IxDyn(&shape[1..]));
            for i in 0..n {
                let width = knots[i + degree + 1] - knots[i];
                running = running + &coefficients.index_axis(Axis(0), i) * (width / (degree + 1) as f64);
                integrated.index_axis_mut(Axis(0), i + 1).assign(&running);
            }

            let mut extended = Vec::with_capacity(knots.len() + 2);
            extended.push(knots[0]);
            extended.extend(knots.iter().copied());
            extended.push(knots[knots.len() - 1]);

            knots = Array1::from(extended);
            coefficients = integrated;
            degree += 1;
        }

        BSpline {
            knots: KnotVector::from_raw(knots, degree),
            coefficients,
        }
    }
}

/// Values of the `degree + 1` basis functions that do not vanish on knot span `span`,
/// evaluated at `x` (Cox-de Boor recursion).
pub(crate) fn basis_functions(knots: &Array1<f64>, degree: usize, span: usize, x: f64) -> Vec<f64> {
    let mut basis = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    basis[0] = 1.0;

    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = basis[r] / (right[r + 1] + left[j - r]);
            basis[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        basis[j] = saved;
    }
    basis
}

impl PPoly {
    /// Converts a B-spline into the power basis on its distinct knots.
    ///
    /// The coefficient of `(x - b[j])^p` is the `p`-th derivative of the spline just to the
    /// right of breakpoint `b[j]`, divided by `p!`.
    pub fn from_spline(spline: &BSpline, fill_value: f64) -> Result<PPoly> {
        let degree = spline.degree();
        let breakpoints = spline.knots.breakpoints();
        let left_edges = breakpoints.slice(s![..breakpoints.len() - 1]).to_owned();

        let mut shape = vec![degree + 1, left_edges.len()];
        shape.extend_from_slice(spline.trailing_shape());
        let mut coefficients = ArrayD::<f64>::zeros(IxDyn(&shape));

        for p in 0..=degree {
            let values = spline.derivative(p)?.evaluate(&left_edges, 0)?;
            coefficients
                .index_axis_mut(Axis(0), degree - p)
                .assign(&(values / factorial(p)));
        }
        debug!(
            "converted spline of degree {} to {} power basis pieces",
            degree,
            left_edges.len()
        );

        Ok(PPoly::new(coefficients, breakpoints)?.with_fill_value(fill_value))
    }

    /// [PPoly::from_spline] for a raw `(knots, coefficients, degree)` triple.
    pub fn from_tck<S, D>(
        knots: Array1<f64>,
        coefficients: ArrayBase<S, D>,
        degree: usize,
        fill_value: f64,
    ) -> Result<PPoly>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        PPoly::from_spline(&BSpline::new(knots, coefficients, degree)?, fill_value)
    }
}
