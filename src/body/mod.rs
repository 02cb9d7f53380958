use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::Node;
use crate::consts::MAX_NESTING;
use crate::context::{Metadata, ParseContext};
use crate::error::Error;
use crate::tag::TagParser;

lazy_static! {
    // The attrs run is quote-aware: a double-quoted value may contain `]`,
    // so tags can nest inside quoted parameters like `header="see [key F1]"`.
    static ref TAG_OPEN: Regex =
        Regex::new(r#"\[([a-z]+)((?:[ \t](?:"[^"\n]*"|[^\]\n])*)?)\]"#).unwrap();
}

/// One bbtag occurrence as the tokenizer found it, before any semantic
/// interpretation. `attrs` and `body` stay raw.
#[derive(Debug, Clone, PartialEq)]
pub struct TagToken {
    pub name: String,
    pub attrs: String,
    pub body: String,
    /// Set when the tag occupies a line of its own; `img` renders such
    /// occurrences as figures.
    pub is_figure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Literal(String),
    Tag(TagToken),
}

/// Splits text into literal runs and tag tokens. An opener with a matching
/// `[/name]` closer captures the enclosed text as the token body (nesting of
/// the same tag is respected); an opener without one yields an empty body.
/// Anything else, including stray closers, stays literal.
pub fn tokenize(text: &str) -> Vec<BodyItem> {
    let mut items = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(caps) = TAG_OPEN.captures(&text[pos..]) else {
            break;
        };
        let (Some(full), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let open_start = pos + full.start();
        let open_end = pos + full.end();
        let name = name.as_str();
        let attrs = caps.get(2).map_or("", |m| m.as_str()).trim();

        if open_start > pos {
            items.push(BodyItem::Literal(text[pos..open_start].to_string()));
        }

        let (body, consumed_end) = match find_close(text, open_end, name) {
            Some((close_start, close_end)) => (&text[open_end..close_start], close_end),
            None => ("", open_end),
        };

        let at_line_start = open_start == 0 || text.as_bytes()[open_start - 1] == b'\n';
        let after = &text[consumed_end..];
        let at_line_end = after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n");

        items.push(BodyItem::Tag(TagToken {
            name: name.to_string(),
            attrs: attrs.to_string(),
            body: body.to_string(),
            is_figure: at_line_start && at_line_end,
        }));

        pos = consumed_end;
    }

    if pos < text.len() {
        items.push(BodyItem::Literal(text[pos..].to_string()));
    }

    items
}

/// Finds the `[/name]` closer matching an opener that ended at `from`,
/// skipping over nested same-name pairs. Returns the closer's byte range.
fn find_close(text: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let open = format!("[{name}");
    let close = format!("[/{name}]");

    let mut depth = 0usize;
    let mut i = from;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with(&close) {
            if depth == 0 {
                return Some((i, i + close.len()));
            }
            depth -= 1;
            i += close.len();
        } else if rest.starts_with(&open)
            && matches!(rest[open.len()..].chars().next(), Some(']' | ' ' | '\t'))
        {
            depth += 1;
            i += open.len();
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// Recursive-descent driver: turns a content string into an ordered node
/// sequence, handing every tag token to the [`TagParser`].
pub struct BodyParser<'a> {
    text: &'a str,
    ctx: &'a ParseContext,
    depth: usize,
}

impl<'a> BodyParser<'a> {
    pub fn new(text: &'a str, ctx: &'a ParseContext) -> Self {
        Self::nested(text, ctx, 0)
    }

    pub(crate) fn nested(text: &'a str, ctx: &'a ParseContext, depth: usize) -> Self {
        Self { text, ctx, depth }
    }

    pub fn parse(&self, meta: &mut Metadata) -> Result<Vec<Node>, Error> {
        if self.depth > MAX_NESTING {
            return Err(Error::NestingTooDeep);
        }

        let mut nodes = Vec::new();
        for item in tokenize(self.text) {
            match item {
                BodyItem::Literal(text) => nodes.push(Node::Text(text)),
                BodyItem::Tag(token) => {
                    nodes.push(TagParser::nested(token, self.ctx, self.depth).parse(meta)?)
                }
            }
        }
        Ok(nodes)
    }
}
