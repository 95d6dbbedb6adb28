use thiserror::Error;

/// Failure to interpret (part of) a response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteParseError {
    /// A field required to build a quote is absent from the body.
    #[error("Missing field: {field}")]
    MissingField {
        /// Name of the field as it appears in the body
        field: &'static str,
    },

    /// A single row of a multi-quote body is malformed and was skipped.
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow {
        /// 1-based line number in the body
        line: u64,
        /// What was wrong with the row
        message: String,
    },

    /// The body does not have the expected shape at all.
    #[error("Unexpected format: {0}")]
    UnexpectedFormat(String),
}
