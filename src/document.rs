use serde::Serialize;

use crate::ast::Node;
use crate::body::BodyParser;
use crate::context::{Metadata, ParseContext};
use crate::error::Error;

/// A fully parsed document: the node tree plus the metadata its tags
/// accumulated along the way. Handed to the serializer as one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub content: Vec<Node>,
    pub meta: Metadata,
}

/// Parses one document. Creates a fresh [`Metadata`] accumulator, so nothing
/// leaks between documents; the context is only read.
pub fn parse_document(text: &str, ctx: &ParseContext) -> Result<Document, Error> {
    let mut meta = Metadata::default();
    let content = BodyParser::new(text, ctx).parse(&mut meta)?;
    Ok(Document { content, meta })
}
