use log::debug;
use ndarray::{ArrayBase, Data, Ix1};

use crate::{
    error::{InterpolateError, Result},
    polynomial::Polynomial,
};

/// Polynomial of degree at most `n - 1` through the `n` points `(x[i], y[i])`.
///
/// Each basis polynomial is expanded as a product of linear factors, so the result is only
/// accurate for a handful of well separated points.
///
/// # Example
/// ```
/// use ndarray::array;
/// use piecewise_poly::lagrange;
///
/// let parabola = lagrange(&array![0.0, 1.0, 2.0], &array![1.0, 2.0, 5.0]).unwrap();
/// assert_eq!(2, parabola.degree());
/// assert!((parabola.evaluate(3.0) - 10.0).abs() < 1e-12);
/// ```
pub fn lagrange<S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> Result<Polynomial>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    let n = x.len();
    if y.len() != n {
        return Err(InterpolateError::Shape(format!(
            "x has {} points but y has {}",
            n,
            y.len()
        )));
    }
    if n == 0 {
        return Err(InterpolateError::insufficient(1, 0, "lagrange polynomial"));
    }

    let mut sum = vec![0.0; n];
    for (j, (&xj, &yj)) in x.iter().zip(y.iter()).enumerate() {
        let mut basis = vec![1.0];
        let mut denominator = 1.0;
        for (k, &xk) in x.iter().enumerate() {
            if k == j {
                continue;
            }
            if xk == xj {
                return Err(InterpolateError::NotIncreasing(format!(
                    "duplicate abscissa {}",
                    xj
                )));
            }
            basis = multiply_by_root(&basis, xk);
            denominator *= xj - xk;
        }
        for (s, b) in sum.iter_mut().zip(basis.iter()) {
            *s += yj * b / denominator;
        }
    }

    debug!("lagrange polynomial through {} points", n);
    Ok(Polynomial::new(sum))
}

/// Coefficients of `p(x) * (x - root)`, both highest power first.
fn multiply_by_root(coefficients: &[f64], root: f64) -> Vec<f64> {
    let mut product = coefficients.to_vec();
    product.push(0.0);
    for (i, c) in coefficients.iter().enumerate() {
        product[i + 1] -= root * c;
    }
    product
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{array, Array1};

    use super::*;

    #[test]
    fn quartic() {
        let p = Polynomial::new(vec![5.0, 2.0, 1.0, 4.0, 3.0]);
        let x = Array1::range(0.0, 5.0, 1.0);
        let y = x.mapv(|v| p.evaluate(v));

        let fitted = lagrange(&x, &y).unwrap();
        assert_eq!(4, fitted.degree());
        for (a, b) in fitted.coefficients().iter().zip(p.coefficients()) {
            assert_approx_eq!(*a, *b, 1e-9);
        }
    }

    #[test]
    fn single_point_is_constant() {
        let constant = lagrange(&array![2.0], &array![7.0]).unwrap();
        assert_eq!(&[7.0], constant.coefficients());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            lagrange(&array![0.0, 1.0, 0.0], &array![1.0, 2.0, 3.0]),
            Err(InterpolateError::NotIncreasing(_))
        ));
        assert!(matches!(
            lagrange(&array![0.0, 1.0], &array![1.0]),
            Err(InterpolateError::Shape(_))
        ));
    }

    #[test]
    fn multiply() {
        // (x + 1)(x - 2) = x^2 - x - 2
        assert_eq!(vec![1.0, -1.0, -2.0], multiply_by_root(&[1.0, 1.0], 2.0));
    }
}
