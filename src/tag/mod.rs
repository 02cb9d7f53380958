use crate::ast::Node;
use crate::attrs::{parse_attrs, ParamMap};
use crate::body::{BodyParser, TagToken};
use crate::consts;
use crate::context::{Metadata, ParseContext};
use crate::error::{Error, RuleError, TagError};

fn class_attr(class: &str) -> ParamMap {
    let mut attrs = ParamMap::new();
    attrs.insert("class".into(), class.into());
    attrs
}

/// Interprets one tag token against the parse context and produces exactly
/// one node.
///
/// Node attributes are *not* sanitized downstream; they may contain anything,
/// `onclick=` included. The parser is the security boundary: it knows the
/// current trust mode and must only emit attributes that are safe in it.
///
/// Classification order: block set, source set, then the closed rule table.
/// Every branch runs through one recovery boundary: a [`TagError`] becomes an
/// inline [`Node::Error`] placeholder so the rest of the document renders,
/// while unknown tags and nesting overflow stay fatal.
pub struct TagParser<'a> {
    token: TagToken,
    params: ParamMap,
    ctx: &'a ParseContext,
    depth: usize,
}

impl<'a> TagParser<'a> {
    pub fn new(token: TagToken, ctx: &'a ParseContext) -> Self {
        Self::nested(token, ctx, 0)
    }

    pub(crate) fn nested(token: TagToken, ctx: &'a ParseContext, depth: usize) -> Self {
        let params = parse_attrs(&token.attrs);
        Self {
            token,
            params,
            ctx,
            depth,
        }
    }

    pub fn parse(&self, meta: &mut Metadata) -> Result<Node, Error> {
        let name = self.token.name.as_str();

        let result = if let Some(title) = consts::BLOCK_TITLES.get(name) {
            self.parse_block(title, meta)
        } else if consts::SOURCE_TAGS.contains(name) {
            self.parse_source()
        } else {
            match name {
                "demo" => self.parse_demo(),
                "head" => self.parse_head(meta),
                "libs" => self.parse_libs(meta),
                "importance" => self.parse_importance(meta),
                "edit" => self.parse_edit(),
                "cut" => Ok(Node::Cut),
                "key" => Ok(Node::Key(self.token.attrs.trim().to_string())),
                "summary" => self.parse_summary(meta),
                "iframe" => self.parse_iframe(),
                "quote" => self.parse_quote(meta),
                "hide" => self.parse_hide(meta),
                "pre" => Ok(Node::Verbatim(self.token.body.clone())),
                "compare" => self.parse_compare(meta),
                "online" => self.parse_online(meta),
                "offline" => self.parse_offline(meta),
                "img" => self.parse_img(),
                "example" => self.parse_example(),
                _ => return Err(Error::UnknownTag(name.to_string())),
            }
        };

        match result {
            Ok(node) => Ok(node),
            Err(RuleError::Reject(e)) => Ok(Node::Error {
                tag: e.tag,
                message: e.message,
            }),
            Err(RuleError::Fatal(e)) => Err(e),
        }
    }

    /// Recursively parses nested markup, one level deeper.
    fn parse_body(&self, text: &str, meta: &mut Metadata) -> Result<Vec<Node>, Error> {
        BodyParser::nested(text, self.ctx, self.depth + 1).parse(meta)
    }

    /// A parameter that must be present and non-empty.
    fn required(&self, param: &str) -> Result<&str, TagError> {
        self.params
            .get(param)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TagError::required_param(&self.token.name, param))
    }

    /// Relative-path policy: absolute paths and protocol-qualified URLs are
    /// rejected so authors cannot embed arbitrary local or external resources.
    fn check_relative(&self, src: &str) -> Result<(), TagError> {
        if src.starts_with('/') || src.contains("://") {
            Err(TagError::src_not_relative(&self.token.name))
        } else {
            Ok(())
        }
    }

    /// Admonition block: a header section (default title, or the `header`
    /// parameter parsed as markup) followed by the parsed body, in a container
    /// classed after the tag name.
    fn parse_block(&self, title: &str, meta: &mut Metadata) -> Result<Node, RuleError> {
        let header_children = match self.params.get("header").filter(|v| !v.is_empty()) {
            Some(header) => vec![
                Node::element("span", "", class_attr("important__type")),
                Node::composite(
                    "h3",
                    self.parse_body(header, meta)?,
                    class_attr("important__title"),
                ),
            ],
            None => vec![Node::element(
                "span",
                title,
                class_attr("important__type"),
            )],
        };

        let children = vec![
            Node::classed_div("important__header", header_children),
            Node::classed_div(
                "important__content",
                self.parse_body(&self.token.body, meta)?,
            ),
        ];

        Ok(Node::composite(
            "div",
            children,
            class_attr(&format!("important important_{}", self.token.name)),
        ))
    }

    fn parse_source(&self) -> Result<Node, RuleError> {
        let src = self
            .params
            .get("src")
            .filter(|v| !v.is_empty())
            .map(String::as_str);
        if let Some(src) = src {
            self.check_relative(src)?;
        }

        Ok(Node::Source {
            kind: self.token.name.clone(),
            body: self.token.body.clone(),
            src: src.map(String::from),
            params: self.params.clone(),
        })
    }

    fn parse_demo(&self) -> Result<Node, RuleError> {
        match self.params.get("src").filter(|v| !v.is_empty()) {
            Some(src) => {
                let mut attrs = ParamMap::new();
                attrs.insert("href".into(), format!("{src}/"));
                attrs.insert("target".into(), "_blank".into());
                Ok(Node::element("a", consts::DEMO_LINK_LABEL, attrs))
            }
            None => {
                let mut attrs = ParamMap::new();
                attrs.insert("onclick".into(), "runDemo(this)".into());
                Ok(Node::element("button", consts::DEMO_BUTTON_LABEL, attrs))
            }
        }
    }

    fn parse_head(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        if self.ctx.trusted {
            meta.head.push(self.token.body.clone());
        }
        Ok(Node::text(""))
    }

    fn parse_libs(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        if self.ctx.trusted {
            for line in self.token.body.lines() {
                let lib = line.trim();
                if !lib.is_empty() {
                    meta.add_lib(lib);
                }
            }
        }
        Ok(Node::text(""))
    }

    /// `[importance N]` takes the whole raw attribute string as the number.
    fn parse_importance(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        if self.ctx.trusted {
            let value = self
                .token
                .attrs
                .trim()
                .parse()
                .map_err(|_| TagError::new(&self.token.name, "importance must be an integer"))?;
            meta.importance = Some(value);
        }
        Ok(Node::text(""))
    }

    fn parse_edit(&self) -> Result<Node, RuleError> {
        let src = self.required("src")?;
        self.check_relative(src)?;

        let mut attrs = ParamMap::new();
        attrs.insert("src".into(), src.into());
        Ok(Node::EditLink {
            body: self.token.body.clone(),
            attrs,
        })
    }

    fn parse_summary(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        let summary = self.parse_body(&self.token.body, meta)?;
        let content = Node::classed_div("summary__content", summary);
        Ok(Node::classed_div("summary", vec![content]))
    }

    fn parse_iframe(&self) -> Result<Node, RuleError> {
        let src = self.required("src")?;

        if src.contains("://") && !self.ctx.trusted {
            return Err(TagError::new(&self.token.name, "protocol not allowed").into());
        }

        let mut attrs = ParamMap::new();
        attrs.insert("class".into(), "result__iframe".into());
        let trusted_marker = if self.ctx.trusted { "1" } else { "0" };
        attrs.insert("data-trusted".into(), trusted_marker.into());

        if let Some(height) = self.params.get("height").filter(|v| !v.is_empty()) {
            let mut height: i64 = height
                .trim()
                .parse()
                .map_err(|_| TagError::new(&self.token.name, "height must be an integer"))?;
            if !self.ctx.trusted {
                height = height.max(consts::UNTRUSTED_IFRAME_MIN_HEIGHT);
            }
            attrs.insert("style".into(), format!("height: {height}px"));
        } else {
            attrs.insert("data-autoresize".into(), "1".into());
        }

        // A host-relative src means the static host serves it; a rooted or
        // protocol-qualified one points at a dynamic service.
        let src = if !src.starts_with('/') && !src.contains("://") {
            self.ctx.static_url(src)
        } else {
            src.to_string()
        };
        attrs.insert("src".into(), format!("{src}/"));

        for (param, attr) in [("play", "data-play"), ("link", "data-external"), ("zip", "data-zip")]
        {
            if self.params.contains_key(param) {
                attrs.insert(attr.into(), "1".into());
            }
        }

        Ok(Node::element("iframe", "", attrs))
    }

    fn parse_quote(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        let mut children = self.parse_body(&self.token.body, meta)?;

        if let Some(author) = self.params.get("author").filter(|v| !v.is_empty()) {
            children.push(Node::element("div", author, class_attr("quote-author")));
        }

        let content = Node::composite("div", children, class_attr("quote-author"));
        Ok(Node::classed_div("quote", vec![content]))
    }

    fn parse_hide(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        let content = self.parse_body(&self.token.body, meta)?;
        let mut children = vec![Node::classed_div("hide-content", content)];

        if let Some(text) = self.params.get("text").filter(|v| !v.is_empty()) {
            let label = self.parse_body(text, meta)?;
            let mut attrs = class_attr("hide-link");
            attrs.insert("href".into(), "javascript:;".into());
            children.insert(0, Node::composite("a", label, attrs));
        }

        Ok(Node::classed_div("hide-close", children))
    }

    fn parse_compare(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        let mut pros = Vec::new();
        let mut cons = Vec::new();

        for item in self.token.body.split('\n') {
            if item.is_empty() {
                continue;
            }
            if let Some(rest) = item.strip_prefix('+') {
                pros.push(Node::composite(
                    "li",
                    self.parse_body(rest, meta)?,
                    class_attr("plus"),
                ));
            } else if let Some(rest) = item.strip_prefix('-') {
                cons.push(Node::composite(
                    "li",
                    self.parse_body(rest, meta)?,
                    class_attr("minus"),
                ));
            } else {
                return Err(TagError::new(
                    &self.token.name,
                    "compare items should start with either + or -",
                )
                .into());
            }
        }

        let with_titles = !pros.is_empty() && !cons.is_empty();
        let mut columns = Vec::new();

        if !pros.is_empty() {
            if with_titles {
                pros.insert(
                    0,
                    Node::element("h3", consts::COMPARE_PROS_TITLE, class_attr("balance__title")),
                );
            }
            let list = Node::composite("ul", pros, class_attr("balance__list"));
            columns.push(Node::classed_div("balance__pluses", vec![list]));
        }

        if !cons.is_empty() {
            if with_titles {
                cons.insert(
                    0,
                    Node::element("h3", consts::COMPARE_CONS_TITLE, class_attr("balance__title")),
                );
            }
            let list = Node::composite("ul", cons, class_attr("balance__list"));
            columns.push(Node::classed_div("balance__minuses", vec![list]));
        }

        let balance = Node::classed_div("balance__content", columns);
        let class = if with_titles {
            "balance"
        } else {
            "balance balance_single"
        };
        Ok(Node::composite("div", vec![balance], class_attr(class)))
    }

    fn parse_online(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        if !self.ctx.export {
            Ok(Node::Fragment(self.parse_body(&self.token.body, meta)?))
        } else {
            Ok(Node::text(""))
        }
    }

    fn parse_offline(&self, meta: &mut Metadata) -> Result<Node, RuleError> {
        if self.ctx.export {
            Ok(Node::Fragment(self.parse_body(&self.token.body, meta)?))
        } else {
            Ok(Node::text(""))
        }
    }

    /// Trusted authors keep every attribute; untrusted ones keep only the
    /// harmless sizing trio.
    fn parse_img(&self) -> Result<Node, RuleError> {
        self.required("src")?;

        let attrs = if self.ctx.trusted {
            self.params.clone()
        } else {
            let mut safe = ParamMap::new();
            for key in ["src", "width", "height"] {
                if let Some(value) = self.params.get(key) {
                    safe.insert(key.into(), value.clone());
                }
            }
            safe
        };

        Ok(Node::Image {
            attrs,
            is_figure: self.token.is_figure,
        })
    }

    fn parse_example(&self) -> Result<Node, RuleError> {
        let src = self.required("src")?;
        self.check_relative(src)?;

        Ok(Node::Example {
            params: self.params.clone(),
        })
    }
}
