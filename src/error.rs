use thiserror::Error;

/// Convenience result type for query construction and sequence-operand operators.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error type returned by the query pipeline.
///
/// Callback-taking operators never fail; only construction and the operators that take another
/// sequence as an operand can produce one of these.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The source handed to the pipeline is missing or is not a sequence.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A sequence-operand operator (`union`, `except`, `intersect`, `zip`, `sequence_equal`)
    /// received something other than a sequence.
    #[error("invalid operand for '{operator}': {message}")]
    InvalidOperand {
        operator: &'static str,
        message: String,
    },
}

impl QueryError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_operand(operator: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operator,
            message: message.into(),
        }
    }
}
