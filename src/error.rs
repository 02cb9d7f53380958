use thiserror::Error;

use crate::consts::MAX_NESTING;

/// Failures that abort the whole document parse.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// The parse context was built without an explicit trust mode. This is a
    /// caller integration bug, not a content problem.
    #[error("parse context requires an explicit trust mode")]
    MissingTrustMode,

    #[error("unknown bbtag: {0}")]
    UnknownTag(String),

    #[error("markup nesting exceeds {MAX_NESTING} levels")]
    NestingTooDeep,
}

/// A tag-local, recoverable failure: missing required parameter, disallowed
/// `src`, malformed compare-block syntax. Carries the offending tag name so
/// the placeholder node can point at it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{tag}] {message}")]
pub struct TagError {
    pub tag: String,
    pub message: String,
}

impl TagError {
    pub fn new<T: Into<String>, M: Into<String>>(tag: T, message: M) -> Self {
        Self {
            tag: tag.into(),
            message: message.into(),
        }
    }

    pub fn required_param(tag: &str, param: &str) -> Self {
        Self::new(tag, format!("{tag}: attribute required {param}"))
    }

    pub fn src_not_relative(tag: &str) -> Self {
        Self::new(tag, "src must be relative, protocol not allowed")
    }
}

/// Outcome of a single per-tag rule. `Reject` becomes an inline error
/// placeholder at the dispatch boundary; `Fatal` propagates past it.
#[derive(Error, Debug, PartialEq)]
pub enum RuleError {
    #[error(transparent)]
    Reject(#[from] TagError),

    #[error(transparent)]
    Fatal(#[from] Error),
}
