use log::debug;
use ndarray::{arr0, ArrayD, Axis, IxDyn};

use crate::{
    error::{InterpolateError, Result},
    polynomial::{factorial, falling_factorial, rising_factorial},
    ppoly::{evaluate_piece, OutOfBounds, PPoly},
};

impl PPoly {
    /// `k`-th derivative as a new table of order `order - k`, or a zero table of order 0 when
    /// `k` exceeds the order.
    ///
    /// # Example
    /// ```
    /// use ndarray::array;
    /// use piecewise_poly::PPoly;
    ///
    /// // 4x^3 + 3x^2 + 2x + 1 on [0, 1]
    /// let pp = PPoly::new(array![[4.0], [3.0], [2.0], [1.0]], array![0.0, 1.0]).unwrap();
    /// assert_eq!(&array![[12.0], [6.0], [2.0]].into_dyn(), pp.derivative(1).coefficients());
    /// ```
    pub fn derivative(&self, k: usize) -> PPoly {
        let order = self.order();
        let coefficients = self.coefficients();

        let derived = if k > order {
            let mut shape = coefficients.shape().to_vec();
            shape[0] = 1;
            ArrayD::zeros(IxDyn(&shape))
        } else {
            let mut shape = coefficients.shape().to_vec();
            shape[0] = order - k + 1;
            let mut derived = ArrayD::zeros(IxDyn(&shape));
            for i in 0..=order - k {
                let scale = falling_factorial(order - i, k);
                derived
                    .index_axis_mut(Axis(0), i)
                    .assign(&(&coefficients.index_axis(Axis(0), i) * scale));
            }
            derived
        };

        PPoly::from_parts(
            self.partition().clone(),
            derived,
            self.fill_value(),
            self.extrapolate(),
        )
    }

    /// `k`-th antiderivative as a new table of order `order + k`.
    ///
    /// The integration constants of the first interval are zero; those of every following
    /// interval make the antiderivative and its first `k - 1` derivatives continuous at the
    /// shared breakpoint.
    pub fn antiderivative(&self, k: usize) -> PPoly {
        let order = self.order();
        let coefficients = self.coefficients();

        let mut shape = coefficients.shape().to_vec();
        shape[0] = order + k + 1;
        let mut integrated = ArrayD::zeros(IxDyn(&shape));
        for i in 0..=order {
            let scale = rising_factorial(order - i + 1, k);
            integrated
                .index_axis_mut(Axis(0), i)
                .assign(&(&coefficients.index_axis(Axis(0), i) / scale));
        }

        if k > 0 {
            self.fix_continuity(&mut integrated, k - 1);
        }
        debug!("antiderivative of order {} -> {}", order, order + k);

        PPoly::from_parts(
            self.partition().clone(),
            integrated,
            self.fill_value(),
            self.extrapolate(),
        )
    }

    /// Sets the coefficients of powers `0..=highest` on intervals `1..m` so that derivatives
    /// `0..=highest` match the previous piece at the left breakpoint.
    fn fix_continuity(&self, coefficients: &mut ArrayD<f64>, highest: usize) {
        let order = coefficients.shape()[0] - 1;
        let breakpoints = self.breakpoints();
        let mut value = ArrayD::zeros(IxDyn(self.trailing_shape()));

        for j in 1..self.intervals() {
            let d = breakpoints[j] - breakpoints[j - 1];
            for p in (0..=highest).rev() {
                evaluate_piece(coefficients, j - 1, d, p, value.view_mut());
                let scale = factorial(p);
                coefficients
                    .index_axis_mut(Axis(0), order - p)
                    .index_axis_mut(Axis(0), j)
                    .assign(&(&value / scale));
            }
        }
    }

    /// Definite integral over `[a, b]`, shaped like the trailing dimensions.
    ///
    /// With [OutOfBounds::Extrapolate] the boundary pieces are integrated beyond the domain.
    /// Otherwise a limit outside of the domain gives the fill value or an error.
    pub fn integrate(&self, a: f64, b: f64) -> Result<ArrayD<f64>> {
        let outside = [a, b]
            .into_iter()
            .find(|x| self.partition().is_out_of_range(*x));
        if let Some(point) = outside {
            match self.extrapolate() {
                OutOfBounds::Fill => {
                    return Ok(ArrayD::from_elem(IxDyn(self.trailing_shape()), self.fill_value()))
                }
                OutOfBounds::Error => {
                    return Err(InterpolateError::OutOfDomain {
                        point,
                        min: self.partition().min(),
                        max: self.partition().max(),
                    })
                }
                OutOfBounds::Extrapolate => {}
            }
        }

        let antiderivative = self.antiderivative(1);
        let upper = antiderivative.evaluate_with(&arr0(b), 0, OutOfBounds::Extrapolate)?;
        let lower = antiderivative.evaluate_with(&arr0(a), 0, OutOfBounds::Extrapolate)?;
        Ok(upper - lower)
    }
}
