use thiserror::Error;

/// Errors produced by the public surface of this crate.
///
/// Version strings themselves never fail: malformed input participates in
/// the total order through the tokenizer's `invalid` marker instead of being
/// rejected.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum VersionError {
    #[error("unknown version comparison operator: {0}")]
    UnknownOperator(String),
}
