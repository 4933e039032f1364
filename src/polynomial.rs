/// Dense polynomial with coefficients stored highest power first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients ordered from the highest power down to the constant term.
    /// Leading zeros are dropped; an empty vector gives the zero polynomial.
    pub fn new(coefficients: Vec<f64>) -> Self {
        let first_nonzero = coefficients
            .iter()
            .position(|c| *c != 0.0)
            .unwrap_or(coefficients.len().saturating_sub(1));
        let coefficients = if coefficients.is_empty() {
            vec![0.0]
        } else {
            coefficients[first_nonzero..].to_vec()
        };
        Polynomial { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        horner(&self.coefficients, x)
    }

    /// `n`-th derivative. Differentiating past the degree gives the zero polynomial.
    pub fn derivative(&self, n: usize) -> Polynomial {
        let degree = self.degree();
        if n > degree {
            return Polynomial::new(vec![0.0]);
        }
        let coefficients = (0..=degree - n)
            .map(|i| self.coefficients[i] * falling_factorial(degree - i, n))
            .collect();
        Polynomial::new(coefficients)
    }

    /// `n`-th antiderivative with all integration constants set to zero.
    pub fn antiderivative(&self, n: usize) -> Polynomial {
        let degree = self.degree();
        let mut coefficients: Vec<f64> = (0..=degree)
            .map(|i| self.coefficients[i] / rising_factorial(degree - i + 1, n))
            .collect();
        coefficients.extend(std::iter::repeat(0.0).take(n));
        Polynomial::new(coefficients)
    }
}

/// Horner evaluation of `coefficients` (highest power first) at `x`.
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

/// `n * (n - 1) * ... * (n - r + 1)`, the factor picked up by `x^n` when differentiated `r` times.
/// Zero when `r > n`.
pub fn falling_factorial(n: usize, r: usize) -> f64 {
    let mut multiplier = 1.0;
    let mut coeff = n as f64;
    for _ in 0..r {
        multiplier *= coeff;
        coeff -= 1.0;
    }
    multiplier
}

/// `n * (n + 1) * ... * (n + r - 1)`.
pub fn rising_factorial(n: usize, r: usize) -> f64 {
    (0..r).fold(1.0, |acc, i| acc * (n + i) as f64)
}

pub fn factorial(n: usize) -> f64 {
    falling_factorial(n, n)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use super::*;

    #[test]
    fn evaluate() {
        let eps = 1e-6;
        // -0.25 x^2 + 2.5 x + 1
        let polynomial = Polynomial::new(vec![-0.25, 2.5, 1.0]);

        assert_approx_eq!(polynomial.evaluate(2.1), 5.1475, eps);
        assert_approx_eq!(polynomial.evaluate(-3.14), -9.3149, eps);
        assert_approx_eq!(polynomial.evaluate(0.0), 1.0, eps);
    }

    #[test]
    fn leading_zeros_are_dropped() {
        let polynomial = Polynomial::new(vec![0.0, 0.0, 3.0, 1.0]);
        assert_eq!(1, polynomial.degree());
        assert_eq!(&[3.0, 1.0], polynomial.coefficients());

        let zero = Polynomial::new(vec![0.0, 0.0]);
        assert_eq!(0, zero.degree());
        assert_eq!(0.0, zero.evaluate(12.0));
    }

    #[test]
    fn factorials() {
        assert_eq!(1.0, falling_factorial(5, 0));
        assert_eq!(20.0, falling_factorial(5, 2));
        assert_eq!(120.0, falling_factorial(5, 5));
        assert_eq!(0.0, falling_factorial(3, 4));
        assert_eq!(6.0, rising_factorial(1, 3));
        assert_eq!(30.0, rising_factorial(5, 2));
        assert_eq!(24.0, factorial(4));
        assert_eq!(1.0, factorial(0));
    }

    #[test]
    fn derivative_and_antiderivative() {
        // 4x^3 + 3x^2 + 2x + 1
        let polynomial = Polynomial::new(vec![4.0, 3.0, 2.0, 1.0]);

        assert_eq!(&[12.0, 6.0, 2.0], polynomial.derivative(1).coefficients());
        assert_eq!(&[24.0, 6.0], polynomial.derivative(2).coefficients());
        assert_eq!(0, polynomial.derivative(4).degree());

        let integrated = polynomial.antiderivative(2);
        assert_eq!(5, integrated.degree());
        let restored = integrated.derivative(2);
        for (a, b) in restored.coefficients().iter().zip(polynomial.coefficients()) {
            assert_approx_eq!(*a, *b, 1e-12);
        }
    }
}
