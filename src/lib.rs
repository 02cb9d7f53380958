pub mod ast;
pub mod attrs;
pub mod body;
mod consts;
pub mod context;
pub mod document;
mod error;
pub mod tag;

pub use consts::MAX_NESTING;
pub use error::*;
