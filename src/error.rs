use thiserror::Error;

pub type Result<T> = std::result::Result<T, InterpolateError>;

/// Errors raised while building or evaluating piecewise polynomials and interpolants.
#[derive(Debug, Error)]
pub enum InterpolateError {
    /// Array dimensionality or lengths do not fit together.
    #[error("shape error: {0}")]
    Shape(String),

    /// Fewer samples than the requested method needs.
    #[error("insufficient data for {context}: need at least {required}, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: String,
    },

    /// Breakpoints or sample abscissas are not strictly increasing.
    #[error("not strictly increasing: {0}")]
    NotIncreasing(String),

    /// Query point outside of the domain while bounds are enforced.
    #[error("value {point} is out of range [{min}, {max}]")]
    OutOfDomain { point: f64, min: f64, max: f64 },

    /// Knots, coefficients and degree do not describe a valid B-spline.
    #[error("malformed spline: {0}")]
    MalformedSpline(String),

    /// A sample value could not be converted to `f64`.
    #[error("value cannot be represented as f64")]
    NotRepresentable,

    #[error("invalid interpolation kind: {0}")]
    InvalidKind(String),

    /// The interpolation system could not be solved.
    #[error("singular system: {0}")]
    Singular(String),

    #[error(transparent)]
    Layout(#[from] ndarray::ShapeError),
}

impl InterpolateError {
    pub(crate) fn insufficient(required: usize, actual: usize, context: &str) -> Self {
        InterpolateError::InsufficientData {
            required,
            actual,
            context: context.to_string(),
        }
    }
}
