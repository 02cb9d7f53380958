use linked_hash_map::LinkedHashMap;
use pest::Parser;
use pest_derive::Parser;

/// Ordered, unique-key parameter mapping. Insertion order is first
/// appearance; re-writing a key updates the value in place.
pub type ParamMap = LinkedHashMap<String, String>;

#[derive(Parser)]
#[grammar = "grammars/attrs.pest"]
struct TagAttrsParser;

/// Parses a tag's raw attribute string into a [`ParamMap`]. Flags (a key
/// with no `=value`) map to an empty string; callers test for presence.
/// Never fails: an empty string yields an empty map and malformed tails are
/// dropped, matching the tolerant scanner this replaces.
pub fn parse_attrs(raw: &str) -> ParamMap {
    let mut params = ParamMap::new();

    let Ok(mut parsed) = TagAttrsParser::parse(Rule::attrs, raw) else {
        return params;
    };
    let Some(attrs) = parsed.next() else {
        return params;
    };

    for pair in attrs.into_inner() {
        if pair.as_rule() != Rule::param {
            continue;
        }

        let mut inner = pair.into_inner();
        let Some(key) = inner.next() else { continue };
        let value = match inner.next() {
            Some(v) => match v.as_rule() {
                Rule::quoted => v
                    .into_inner()
                    .next()
                    .map(|q| q.as_str().to_string())
                    .unwrap_or_default(),
                _ => v.as_str().to_string(),
            },
            None => String::new(),
        };

        // LinkedHashMap::insert moves a re-inserted key to the back; keys
        // must keep their first-appearance position.
        let key = key.as_str();
        if params.contains_key(key) {
            if let Some(existing) = params.get_mut(key) {
                *existing = value;
            }
        } else {
            params.insert(key.to_string(), value);
        }
    }

    params
}
