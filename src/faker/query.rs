//! Nested query-string parsing for template requests.
//!
//! Bracket notation builds nested objects (`a[b][c]=x`), `a[]=x` and
//! repeated keys build arrays, and small numeric indices (`a[0]=x`) build
//! arrays as well. Conflicting shapes are merged the way the `qs` package
//! merges them, so templates written for existing clients keep working.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Limits applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Bracket segments honoured per key; the remainder stays one literal key
    pub depth: usize,
    /// Pairs read from the query string; later pairs are ignored
    pub parameter_limit: usize,
    /// Largest `[n]` index that still builds an array
    pub array_limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            depth: 5,
            parameter_limit: 1000,
            array_limit: 20,
        }
    }
}

static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]]*\]").expect("segment regex should be valid"));

/// Intermediate tree; lists may be sparse until compacted
#[derive(Debug, Clone)]
enum Node {
    Scalar(Value),
    List(Vec<Option<Node>>),
    Map(IndexMap<String, Node>),
}

impl Node {
    fn text(s: &str) -> Self {
        Node::Scalar(Value::String(s.to_string()))
    }

    fn is_container(&self) -> bool {
        !matches!(self, Node::Scalar(_))
    }

    /// Empty strings are ignored as merge sources
    fn is_empty_scalar(&self) -> bool {
        matches!(self, Node::Scalar(Value::String(s)) if s.is_empty())
    }

    fn into_value(self) -> Value {
        match self {
            Node::Scalar(v) => v,
            Node::List(items) => {
                Value::Array(items.into_iter().flatten().map(Node::into_value).collect())
            }
            Node::Map(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, v.into_value());
                }
                Value::Object(out)
            }
        }
    }
}

fn list_to_map(items: Vec<Option<Node>>) -> IndexMap<String, Node> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| item.map(|node| (i.to_string(), node)))
        .collect()
}

/// Append `value` to the value already collected for a repeated key
fn combine(existing: Node, value: Node) -> Node {
    match existing {
        Node::List(mut items) => {
            items.push(Some(value));
            Node::List(items)
        }
        other => Node::List(vec![Some(other), Some(value)]),
    }
}

fn merge(target: Node, source: Node) -> Node {
    if source.is_empty_scalar() {
        return target;
    }
    match (target, source) {
        (Node::List(mut items), Node::Scalar(s)) => {
            items.push(Some(Node::Scalar(s)));
            Node::List(items)
        }
        (Node::Map(mut map), Node::Scalar(Value::String(key))) => {
            map.entry(key).or_insert(Node::Scalar(Value::Bool(true)));
            Node::Map(map)
        }
        (Node::Map(map), Node::Scalar(_)) => Node::Map(map),
        (target @ Node::Scalar(_), Node::Scalar(s)) => {
            Node::List(vec![Some(target), Some(Node::Scalar(s))])
        }
        (target @ Node::Scalar(_), Node::List(items)) => {
            let mut out = vec![Some(target)];
            out.extend(items);
            Node::List(out)
        }
        (target @ Node::Scalar(_), source @ Node::Map(_)) => {
            Node::List(vec![Some(target), Some(source)])
        }
        (Node::List(mut target), Node::List(source)) => {
            for (i, item) in source.into_iter().enumerate() {
                let Some(item) = item else { continue };
                match target.get_mut(i) {
                    Some(slot) => match slot.take() {
                        Some(existing) if existing.is_container() && item.is_container() => {
                            *slot = Some(merge(existing, item));
                        }
                        Some(existing) => {
                            *slot = Some(existing);
                            target.push(Some(item));
                        }
                        None => *slot = Some(item),
                    },
                    None => {
                        target.resize_with(i, || None);
                        target.push(Some(item));
                    }
                }
            }
            Node::List(target)
        }
        (Node::List(items), Node::Map(source)) => merge_maps(list_to_map(items), source),
        (Node::Map(target), Node::List(items)) => merge_maps(target, list_to_map(items)),
        (Node::Map(target), Node::Map(source)) => merge_maps(target, source),
    }
}

fn merge_maps(mut target: IndexMap<String, Node>, source: IndexMap<String, Node>) -> Node {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(slot) => {
                let existing = std::mem::replace(slot, Node::Map(IndexMap::new()));
                *slot = merge(existing, value);
            }
            None => {
                target.insert(key, value);
            }
        }
    }
    Node::Map(target)
}

/// Split `a[b][c]` into `["a", "[b]", "[c]"]`, folding segments past
/// `depth` into one trailing bracketed segment
fn split_key(key: &str, depth: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let first = if depth > 0 { SEGMENT.find(key) } else { None };
    let parent = first.map_or(key, |m| &key[..m.start()]);
    if !parent.is_empty() {
        segments.push(parent.to_string());
    }
    if depth == 0 {
        return segments;
    }
    let mut taken = 0;
    for m in SEGMENT.find_iter(key) {
        if taken == depth {
            segments.push(format!("[{}]", &key[m.start()..]));
            return segments;
        }
        segments.push(m.as_str().to_string());
        taken += 1;
    }
    segments
}

/// Build the nested node for one key chain, innermost first
fn build_chain(chain: &[String], value: Node, options: &QueryOptions) -> Node {
    let mut leaf = value;
    for root in chain.iter().rev() {
        leaf = if root == "[]" {
            match leaf {
                Node::List(items) => Node::List(items),
                other => Node::List(vec![Some(other)]),
            }
        } else {
            let bracketed = root.starts_with('[') && root.ends_with(']') && root.len() >= 2;
            let clean = if bracketed { &root[1..root.len() - 1] } else { root.as_str() };
            match clean.parse::<usize>() {
                Ok(index)
                    if bracketed
                        && index.to_string() == clean
                        && index <= options.array_limit =>
                {
                    let mut items: Vec<Option<Node>> = vec![None; index];
                    items.push(Some(leaf));
                    Node::List(items)
                }
                _ => {
                    let mut map = IndexMap::new();
                    map.insert(clean.to_string(), leaf);
                    Node::Map(map)
                }
            }
        };
    }
    leaf
}

/// Build a template from already-decoded pairs, in order
fn parse_nested_pairs<I, K, V>(pairs: I, options: &QueryOptions) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut flat: IndexMap<String, Node> = IndexMap::new();
    for (key, value) in pairs.into_iter().take(options.parameter_limit) {
        let key = key.as_ref();
        if key.is_empty() {
            continue;
        }
        let value = Node::text(value.as_ref());
        match flat.get_mut(key) {
            Some(slot) => {
                let existing = std::mem::replace(slot, Node::List(Vec::new()));
                *slot = combine(existing, value);
            }
            None => {
                flat.insert(key.to_string(), value);
            }
        }
    }

    let mut root = Node::Map(IndexMap::new());
    for (key, value) in flat {
        let chain = split_key(&key, options.depth);
        if chain.is_empty() {
            continue;
        }
        root = merge(root, build_chain(&chain, value, options));
    }
    root.into_value()
}

fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Parse a raw query string (without the leading `?`)
pub fn parse_nested_query(query: &str, options: &QueryOptions) -> Value {
    let pairs = query
        .split('&')
        .take(options.parameter_limit)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let split_at = part
                .find("]=")
                .map(|i| i + 1)
                .or_else(|| part.find('='));
            match split_at {
                Some(i) => (decode(&part[..i]), decode(&part[i + 1..])),
                None => (decode(part), String::new()),
            }
        })
        .collect::<Vec<_>>();
    parse_nested_pairs(pairs, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(q: &str) -> Value {
        parse_nested_query(q, &QueryOptions::default())
    }

    #[test]
    fn test_flat_and_nested() {
        assert_eq!(
            parse("fullName=person.fullName&address[city]=location.city&address[geo][lat]=location.latitude"),
            json!({
                "fullName": "person.fullName",
                "address": { "city": "location.city", "geo": { "lat": "location.latitude" } }
            })
        );
    }

    #[test]
    fn test_decoding() {
        assert_eq!(parse("a%5Bb%5D=x+y&c=%7B%7D"), json!({ "a": { "b": "x y" }, "c": "{}" }));
        assert_eq!(parse("flag"), json!({ "flag": "" }));
        assert_eq!(parse("&&a=1&"), json!({ "a": "1" }));
    }

    #[test]
    fn test_arrays() {
        assert_eq!(parse("a[]=x&a[]=y"), json!({ "a": ["x", "y"] }));
        assert_eq!(parse("a=x&a=y"), json!({ "a": ["x", "y"] }));
        assert_eq!(parse("a[1]=y&a[0]=x"), json!({ "a": ["x", "y"] }));
        assert_eq!(parse("a[0][b]=x&a[0][c]=y"), json!({ "a": [{ "b": "x", "c": "y" }] }));
        assert_eq!(parse("a[21]=x"), json!({ "a": { "21": "x" } }));
    }

    #[test]
    fn test_depth_remainder_is_literal_key() {
        let v = parse("a[b][c][d][e][f][g]=x");
        assert_eq!(v, json!({ "a": { "b": { "c": { "d": { "e": { "f": { "[g]": "x" } } } } } } }));
        let opts = QueryOptions { depth: 1, ..QueryOptions::default() };
        assert_eq!(
            parse_nested_query("a[b][c]=x", &opts),
            json!({ "a": { "b": { "[c]": "x" } } })
        );
    }

    #[test]
    fn test_conflicting_shapes_merge() {
        assert_eq!(parse("a=x&a[b]=y"), json!({ "a": ["x", { "b": "y" }] }));
        assert_eq!(parse("a[b]=y&a=x"), json!({ "a": { "b": "y", "x": true } }));
        assert_eq!(parse("a[]=x&a[b]=y"), json!({ "a": { "0": "x", "b": "y" } }));
    }

    #[test]
    fn test_key_order_is_first_seen() {
        let v = parse("z=1&a=2&m=3&a=4");
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parameter_limit() {
        let opts = QueryOptions { parameter_limit: 2, ..QueryOptions::default() };
        assert_eq!(parse_nested_query("a=1&b=2&c=3", &opts), json!({ "a": "1", "b": "2" }));
    }

    #[test]
    fn test_pairs_entry_point() {
        let pairs = vec![("x[y]", "person.firstName"), ("x[y]", "person.lastName")];
        assert_eq!(
            parse_nested_pairs(pairs, &QueryOptions::default()),
            json!({ "x": { "y": ["person.firstName", "person.lastName"] } })
        );
    }
}
