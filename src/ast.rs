use serde::Serialize;

use crate::attrs::ParamMap;

/// A single presentation node. Pure data: the serializer walks the tree and
/// turns it into markup, so child and attribute order must be preserved
/// exactly as produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Node {
    /// Plain text, escaped by the serializer.
    Text(String),
    /// An element with plain-text content.
    Element {
        tag: String,
        text: String,
        attrs: ParamMap,
    },
    /// An element with child nodes.
    Composite {
        tag: String,
        children: Vec<Node>,
        attrs: ParamMap,
    },
    /// A transparent sequence: the serializer splices the children in place
    /// with no wrapper element.
    Fragment(Vec<Node>),
    /// Raw text the serializer must not escape or alter.
    Verbatim(String),
    /// An embedded source listing.
    Source {
        kind: String,
        body: String,
        src: Option<String>,
        params: ParamMap,
    },
    Image {
        attrs: ParamMap,
        is_figure: bool,
    },
    EditLink {
        body: String,
        attrs: ParamMap,
    },
    /// Pagination marker, no content.
    Cut,
    /// A keyboard-key label.
    Key(String),
    Example {
        params: ParamMap,
    },
    /// Inline substitute for a tag that failed to parse; the rest of the
    /// document still renders.
    Error {
        tag: String,
        message: String,
    },
}

impl Node {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Node::Text(text.into())
    }

    pub fn element<T: Into<String>, S: Into<String>>(tag: T, text: S, attrs: ParamMap) -> Self {
        Node::Element {
            tag: tag.into(),
            text: text.into(),
            attrs,
        }
    }

    pub fn composite<T: Into<String>>(tag: T, children: Vec<Node>, attrs: ParamMap) -> Self {
        Node::Composite {
            tag: tag.into(),
            children,
            attrs,
        }
    }

    /// A `div` with a single class attribute, the workhorse container shape.
    pub fn classed_div(class: &str, children: Vec<Node>) -> Self {
        let mut attrs = ParamMap::new();
        attrs.insert("class".into(), class.into());
        Node::composite("div", children, attrs)
    }
}
