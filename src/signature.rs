//! Parser for documented command signatures.
//!
//! A signature is the textual shape of one overload, e.g.
//! `Circle( <Point>, <Number> )`. The `<...>` brackets delimit a typed
//! parameter slot; `[...]` around a whole parameter marks it optional;
//! `|` inside a slot separates alternative types.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SIGNATURE_RE: Regex = Regex::new(r"^\s*([A-Za-z]+)\s*\((.*)\)").unwrap();
    static ref PARAM_SLOT_RE: Regex = Regex::new(r"<([^>]+)>(?:\s+(\w+))?").unwrap();
}

/// One parameter slot of a parsed signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Trailing bare name, e.g. `a` in `<Number a>`. Often empty.
    pub name: String,
    /// Alternative type names for the slot (`<Point|Number>` yields two).
    /// Never empty: an unparseable token degenerates to a single
    /// pseudo-type holding the raw token text.
    pub types: Vec<String>,
    /// True iff the raw parameter text was fully wrapped in `[...]`.
    pub optional: bool,
}

/// A signature broken into its name and ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSignature {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl ParsedSignature {
    /// Count of non-optional parameters
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }

    pub fn total_count(&self) -> usize {
        self.params.len()
    }
}

/// Parse a documented signature string into a name and parameter list.
///
/// If the string does not have the `Name(...)` shape at all, the whole raw
/// text becomes the name and `params` is empty. Callers must treat that
/// combination as "unparsed", not as a zero-arity command.
pub fn parse_signature(signature: &str) -> ParsedSignature {
    let caps = match SIGNATURE_RE.captures(signature) {
        Some(caps) => caps,
        None => {
            return ParsedSignature {
                name: signature.to_string(),
                params: Vec::new(),
            }
        }
    };

    let name = caps[1].to_string();
    let inner = &caps[2];
    let params = split_param_list(inner)
        .iter()
        .map(|token| parse_param(token))
        .collect();

    ParsedSignature { name, params }
}

/// Split a parameter list on top-level commas.
///
/// Only `<`/`>` nest in the signature grammar; a comma inside a typed slot
/// (e.g. a future `<List<Point>>`) is not a separator.
fn split_param_list(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in inner.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

/// Parse one parameter token, e.g. `<Point>`, `[<Number a>]`, `<Point|Number>`.
pub fn parse_param(token: &str) -> ParamSpec {
    let mut text = token.trim();

    let optional = text.starts_with('[') && text.ends_with(']');
    if optional {
        text = text[1..text.len() - 1].trim();
    }

    match PARAM_SLOT_RE.captures(text) {
        Some(caps) => {
            let inner = caps[1].trim().to_string();
            let mut name = caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            // `<Number a>` carries the bare name inside the slot
            let type_expr = if !inner.contains('|') {
                let parts: Vec<&str> = inner.split_whitespace().collect();
                if parts.len() == 2 && name.is_empty() {
                    name = parts[1].to_string();
                    parts[0].to_string()
                } else {
                    inner
                }
            } else {
                inner
            };

            let types = type_expr
                .split('|')
                .map(|t| t.trim().to_string())
                .collect();
            ParamSpec {
                name,
                types,
                optional,
            }
        }
        // No <...> slot at all: the raw text becomes a pseudo-type. This
        // is a deliberate fallback for loosely documented signatures.
        None => ParamSpec {
            name: String::new(),
            types: vec![text.to_string()],
            optional,
        },
    }
}
