use thiserror::Error;

/// Errors that can occur while building strokes or recognizing them.
///
/// A fit test that does not match is not an error: it produces a
/// rejected [`Fit`](crate::Fit) with a fail code.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PaleoError {
    #[error("stroke has no points")]
    EmptyStroke,

    #[error("stroke point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    #[error("could not create shape object: {0}")]
    Beautify(String),

    #[error("recognition took {elapsed_ms}ms, budget was {budget_ms}ms")]
    TimeExceeded { elapsed_ms: u128, budget_ms: u128 },
}
