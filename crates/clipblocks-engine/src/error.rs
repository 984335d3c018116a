/// Rejected option objects.
///
/// Content is never an error anywhere in the engine; only configuration
/// handed in by the caller can fail, and it fails at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("confidence threshold must be within 0.0..=1.0, got {0}")]
    ConfidenceThreshold(f64),
    #[error("indent size must be between 1 and {max} when tabs are disabled, got {got}")]
    IndentSize { got: usize, max: usize },
    #[error("destination limit `{name}` must be at least 1")]
    ZeroLimit { name: &'static str },
    #[error("nesting depth limit must be at most {max}, got {got}")]
    NestingDepth { got: usize, max: usize },
}
