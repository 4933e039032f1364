//! Piecewise polynomials in the power basis and one-dimensional interpolation built on them.
//!
//! A [PPoly] stores one polynomial per interval of a partition, with any number of trailing
//! batch dimensions sharing the breakpoints. It can be evaluated, differentiated, integrated
//! and built from a B-spline. [Interp1d] fits linear, nearest, zero-order hold or spline
//! interpolants through samples along one axis of an n-dimensional array.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use assert_approx_eq::assert_approx_eq;
//! use piecewise_poly::{Interp1d, Kind, PPoly};
//!
//! // x^2 + 2x + 3 on [0, 0.5), 4(x - 0.5)^2 + 5(x - 0.5) + 6 on [0.5, 1]
//! let table = PPoly::new(array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]], array![0.0, 0.5, 1.0]).unwrap();
//! assert_approx_eq!(3.69, table.evaluate_scalar(0.3, 0).unwrap(), 1e-12);
//! assert_approx_eq!(6.0, table.evaluate_scalar(0.5, 0).unwrap(), 1e-12);
//! assert!(table.evaluate_scalar(1.5, 0).unwrap().is_nan());
//!
//! let x = array![0.0, 1.0, 2.0, 3.0, 4.0];
//! let y = x.mapv(|v: f64| v * v * v);
//! let cubic = Interp1d::builder().kind(Kind::Spline(3)).build(&x, &y).unwrap();
//! assert_approx_eq!(3.375, cubic.evaluate_scalar(1.5).unwrap(), 1e-10);
//! ```

mod breakpoints;
mod bspline;
mod calculus;
mod error;
mod interp1d;
mod interp2d;
mod knot;
mod lagrange;
mod polynomial;
mod ppoly;

pub use breakpoints::Breakpoints;
pub use bspline::BSpline;
pub use error::{InterpolateError, Result};
pub use interp1d::{ComplexInterp1d, Interp1d, Interp1dBuilder, Kind};
pub use interp2d::{GridKind, Interp2d, Interp2dBuilder};
pub use knot::KnotVector;
pub use lagrange::lagrange;
pub use polynomial::Polynomial;
pub use ppoly::{OutOfBounds, PPoly};
