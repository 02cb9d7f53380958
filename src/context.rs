use serde::Serialize;

use crate::error::Error;

/// Per-document parse configuration. Shared by reference across one whole
/// document parse and never mutated; the mutable side-output lives in
/// [`Metadata`], which is threaded separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseContext {
    /// Whether the author is a site editor (raw HTML, metadata control) or an
    /// end user whose markup must stay sandboxed.
    pub trusted: bool,
    /// Static-export rendering, as opposed to live serving. Gates the
    /// `online`/`offline` tags.
    pub export: bool,
    pub static_host: String,
    pub resource_web_root: String,
}

impl ParseContext {
    pub fn builder() -> ParseContextBuilder {
        ParseContextBuilder::default()
    }

    /// Resolves a host-relative resource against the static host.
    pub(crate) fn static_url(&self, src: &str) -> String {
        format!("{}{}/{}", self.static_host, self.resource_web_root, src)
    }
}

/// Builder for [`ParseContext`]. The trust mode has no default: leaving it
/// unset is a configuration error, not a silent "untrusted".
#[derive(Debug, Default, Clone)]
pub struct ParseContextBuilder {
    trusted: Option<bool>,
    export: bool,
    static_host: String,
    resource_web_root: String,
}

impl ParseContextBuilder {
    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = Some(trusted);
        self
    }

    pub fn export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    pub fn static_host<S: Into<String>>(mut self, host: S) -> Self {
        self.static_host = host.into();
        self
    }

    pub fn resource_web_root<S: Into<String>>(mut self, root: S) -> Self {
        self.resource_web_root = root.into();
        self
    }

    pub fn build(self) -> Result<ParseContext, Error> {
        Ok(ParseContext {
            trusted: self.trusted.ok_or(Error::MissingTrustMode)?,
            export: self.export,
            static_host: self.static_host,
            resource_web_root: self.resource_web_root,
        })
    }
}

/// Document-scoped side-output. A few tags produce an empty visible node and
/// mutate this instead. One instance per top-level parse; discarded with it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Raw markup fragments destined for the page head, in document order.
    pub head: Vec<String>,
    libs: Vec<String>,
    /// Last write wins.
    pub importance: Option<i64>,
}

impl Metadata {
    /// Adds a library identifier, keeping first-seen order and dropping
    /// duplicates.
    pub fn add_lib(&mut self, lib: &str) {
        if !self.libs.iter().any(|l| l == lib) {
            self.libs.push(lib.to_string());
        }
    }

    pub fn libs(&self) -> &[String] {
        &self.libs
    }
}
