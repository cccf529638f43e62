//! Parser for candidate command lines.
//!
//! One line of the command language looks like `Circle(0,0,5)` or
//! `c=Circle((1,2),3)`. The parser strips an optional assignment target,
//! extracts the command name, and splits the argument list on top-level
//! commas. Argument internals stay opaque: this layer never recurses into
//! them.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ASSIGNMENT_RE: Regex = Regex::new(r"^[A-Za-z_]\w*\s*=\s*(.+)$").unwrap();
    static ref CALL_RE: Regex = Regex::new(r"^([A-Za-z]+)\s*\((.*)\)$").unwrap();
}

/// A command line parsed into its name and raw argument strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCall {
    pub name: String,
    pub args: Vec<String>,
}

/// Parse one command line.
///
/// Returns `None` when the line is not a function call at all (a bare
/// expression, a point literal like `A=(1,2)`, ...). That is an explicit
/// "nothing to structurally validate" signal, not an error.
pub fn parse_command_call(line: &str) -> Option<ParsedCall> {
    let line = line.trim();

    // `c=Circle(0,0,5)`: discard the assignment target and parse the rest.
    // The target identifier's legality is not checked here.
    let body = match ASSIGNMENT_RE.captures(line) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(line).trim(),
        None => line,
    };

    let caps = CALL_RE.captures(body)?;
    let name = caps[1].to_string();
    let args = split_args(&caps[2]);

    Some(ParsedCall { name, args })
}

/// Split an argument list on top-level commas.
///
/// All three bracket families share one nesting counter, since call
/// arguments may themselves contain any of `()`, `{}`, `[]`.
fn split_args(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in inner.chars() {
        match ch {
            '(' | '{' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | '}' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    args.push(current.trim().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_call() {
        let call = parse_command_call("Circle(0,0,5)").unwrap();
        assert_eq!(call.name, "Circle");
        assert_eq!(call.args, vec!["0", "0", "5"]);
    }

    #[test]
    fn assignment_prefix_is_stripped() {
        let bare = parse_command_call("Circle(0,0,5)").unwrap();
        let assigned = parse_command_call("c=Circle(0,0,5)").unwrap();
        assert_eq!(bare, assigned);
    }

    #[test]
    fn nested_parens_do_not_split() {
        let call = parse_command_call("Polygon((1,2),(3,4),(5,6))").unwrap();
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args[0], "(1,2)");
    }

    #[test]
    fn mixed_bracket_families_share_the_counter() {
        let call = parse_command_call("Intersect(Line[A,B],{1,2},c)").unwrap();
        assert_eq!(call.args, vec!["Line[A,B]", "{1,2}", "c"]);
    }

    #[test]
    fn point_literal_is_not_a_call() {
        assert_eq!(parse_command_call("A=(1,2)"), None);
    }

    #[test]
    fn bare_expression_is_not_a_call() {
        assert_eq!(parse_command_call("a+b"), None);
        assert_eq!(parse_command_call(""), None);
    }

    #[test]
    fn empty_argument_list() {
        let call = parse_command_call("Line()").unwrap();
        assert_eq!(call.name, "Line");
        assert!(call.args.is_empty());
    }

    #[test]
    fn args_are_trimmed_but_otherwise_opaque() {
        let call = parse_command_call("Circle( (1,2) , 3+x )").unwrap();
        assert_eq!(call.args, vec!["(1,2)", "3+x"]);
    }
}
