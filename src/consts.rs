use lazy_static::lazy_static;
use linked_hash_map::LinkedHashMap;
use std::collections::HashSet;

/// Recursion limit for nested tags. Exceeding it aborts the parse instead of
/// exhausting the call stack on hostile input.
pub const MAX_NESTING: usize = 64;

/// Minimum iframe height enforced for untrusted authors.
pub const UNTRUSTED_IFRAME_MIN_HEIGHT: i64 = 800;

pub const DEMO_LINK_LABEL: &str = "Demo in new window";
pub const DEMO_BUTTON_LABEL: &str = "Run the demo";

pub const COMPARE_PROS_TITLE: &str = "Pros";
pub const COMPARE_CONS_TITLE: &str = "Cons";

lazy_static! {
    /// Admonition-style block tags and their default header titles, used when
    /// the author gives no `header` parameter.
    pub static ref BLOCK_TITLES: LinkedHashMap<&'static str, &'static str> = {
        let mut m = LinkedHashMap::new();
        m.insert("important", "Important");
        m.insert("warn", "Warning");
        m.insert("smart", "Good to know");
        m
    };

    /// Tags whose body is embedded source code in the named language.
    pub static ref SOURCE_TAGS: HashSet<&'static str> = [
        "js", "html", "css", "coffee", "java", "php", "http", "sql", "txt",
    ]
    .into_iter()
    .collect();
}
