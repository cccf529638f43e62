//! Pattern-based lint rules with deterministic auto-fixes.
//!
//! A second validation layer, independent of the catalog-based arity
//! checker: regex-style structural checks over the raw command text.
//! Typical findings are full-width punctuation from Chinese input methods,
//! missing coordinate separators, and unbalanced parentheses. Each rule
//! optionally carries a fix function producing a repaired command string.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::CommandCatalog;
use crate::diagnostics::{Severity, ValidationIssue};

/// One structural lint rule: a trigger predicate over the raw text and an
/// optional deterministic fix.
pub struct PatternRule {
    /// Stable identifier reported by `apply_fixes`
    pub id: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    check: fn(&str, &CommandCatalog) -> bool,
    fix: Option<fn(&str) -> String>,
}

lazy_static! {
    static ref MISSING_COMMA_RE: Regex =
        Regex::new(r"\(\s*(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s*\)").unwrap();
    static ref SPACED_FUNC_DEF_RE: Regex =
        Regex::new(r"^([A-Za-z])\s*\(\s*([A-Za-z])\s*\)(\s*)=(\s*)(.+)$").unwrap();
    static ref NAME_WHITESPACE_RE: Regex =
        Regex::new(r"^([A-Za-z]\w*(?:\s+\w+)+)\s*=\s*(.+)$").unwrap();
    static ref BARE_POINT_RE: Regex =
        Regex::new(r"^([A-Z][A-Za-z0-9]*)\(\s*(-?[\d.]+)\s*,\s*(-?[\d.]+)\s*\)$").unwrap();
    static ref EMPTY_CALL_RE: Regex =
        Regex::new(r"^(?:[A-Za-z_]\w*\s*=\s*)?([A-Za-z]+)\(\s*\)$").unwrap();
    static ref MULTI_DOT_RE: Regex = Regex::new(r"\d+\.\d*\.[\d.]*").unwrap();
    static ref LOWERCASE_POINT_RE: Regex =
        Regex::new(r"^([a-z]\w*)\s*=\s*\(\s*-?[\d.]+\s*,\s*-?[\d.]+\s*\)$").unwrap();
    static ref LONG_POINT_RE: Regex = Regex::new(
        r"^([A-Za-z]\w*)\s*=\s*Point\s*[\[(]\s*(-?[\d.]+)\s*,\s*(-?[\d.]+)\s*[\])]$"
    )
    .unwrap();
    static ref FUNC_DEF_SHAPE_RE: Regex =
        Regex::new(r"^[A-Za-z]\w*\s*\(\s*[A-Za-z]\s*\)\s*=(.*)$").unwrap();
    static ref TWO_POINT_RE: Regex = Regex::new(
        r"^(?:[A-Za-z_]\w*\s*=\s*)?(Line|Segment|Ray|Vector)\s*[\[(]\s*([A-Za-z]\w*)\s*,\s*([A-Za-z]\w*)\s*[\])]$"
    )
    .unwrap();
}

// ── Rule triggers and fixes ───────────────────────────────────────────

fn has_fullwidth_parens(s: &str, _: &CommandCatalog) -> bool {
    s.contains('（') || s.contains('）')
}

fn fix_fullwidth_parens(s: &str) -> String {
    s.replace('（', "(").replace('）', ")")
}

fn has_fullwidth_comma(s: &str, _: &CommandCatalog) -> bool {
    s.contains('，')
}

fn fix_fullwidth_comma(s: &str) -> String {
    s.replace('，', ",")
}

fn has_missing_comma(s: &str, _: &CommandCatalog) -> bool {
    MISSING_COMMA_RE.is_match(s)
}

fn fix_missing_comma(s: &str) -> String {
    MISSING_COMMA_RE.replace_all(s, "($1,$2)").into_owned()
}

fn has_spaced_func_def(s: &str, _: &CommandCatalog) -> bool {
    SPACED_FUNC_DEF_RE
        .captures(s)
        .map(|c| !c[3].is_empty() || !c[4].is_empty())
        .unwrap_or(false)
}

fn fix_spaced_func_def(s: &str) -> String {
    match SPACED_FUNC_DEF_RE.captures(s) {
        Some(c) => format!("{}({})={}", &c[1], &c[2], &c[5]),
        None => s.to_string(),
    }
}

fn has_name_whitespace(s: &str, _: &CommandCatalog) -> bool {
    NAME_WHITESPACE_RE.is_match(s)
}

fn fix_name_whitespace(s: &str) -> String {
    match NAME_WHITESPACE_RE.captures(s) {
        Some(c) => {
            let name: String = c[1].split_whitespace().collect();
            format!("{}={}", name, &c[2])
        }
        None => s.to_string(),
    }
}

fn has_missing_assignment(s: &str, catalog: &CommandCatalog) -> bool {
    BARE_POINT_RE
        .captures(s)
        .map(|c| !catalog.is_valid_command(&c[1]))
        .unwrap_or(false)
}

fn fix_missing_assignment(s: &str) -> String {
    match BARE_POINT_RE.captures(s) {
        Some(c) => format!("{}=({},{})", &c[1], &c[2], &c[3]),
        None => s.to_string(),
    }
}

fn has_empty_call(s: &str, catalog: &CommandCatalog) -> bool {
    EMPTY_CALL_RE
        .captures(s)
        .map(|c| catalog.is_valid_command(&c[1]))
        .unwrap_or(false)
}

fn has_multi_dot_number(s: &str, _: &CommandCatalog) -> bool {
    MULTI_DOT_RE.is_match(s)
}

fn unclosed_paren_count(s: &str) -> usize {
    let open = s.chars().filter(|&c| c == '(').count();
    let close = s.chars().filter(|&c| c == ')').count();
    open.saturating_sub(close)
}

fn has_unclosed_parens(s: &str, _: &CommandCatalog) -> bool {
    unclosed_paren_count(s) > 0
}

fn fix_unclosed_parens(s: &str) -> String {
    format!("{}{}", s, ")".repeat(unclosed_paren_count(s)))
}

/// All rules in application order. Each fires at most once per line.
static RULES: &[PatternRule] = &[
    PatternRule {
        id: "fullwidth-parens",
        severity: Severity::Error,
        message: "命令中含有全角括号，请改用半角括号 ( )",
        check: has_fullwidth_parens,
        fix: Some(fix_fullwidth_parens),
    },
    PatternRule {
        id: "fullwidth-comma",
        severity: Severity::Error,
        message: "命令中含有全角逗号，请改用半角逗号 ,",
        check: has_fullwidth_comma,
        fix: Some(fix_fullwidth_comma),
    },
    PatternRule {
        id: "missing-comma",
        severity: Severity::Error,
        message: "坐标之间缺少逗号分隔",
        check: has_missing_comma,
        fix: Some(fix_missing_comma),
    },
    PatternRule {
        id: "spaced-function-def",
        severity: Severity::Warning,
        message: "函数定义的等号两侧不应有空格",
        check: has_spaced_func_def,
        fix: Some(fix_spaced_func_def),
    },
    PatternRule {
        id: "name-whitespace",
        severity: Severity::Error,
        message: "对象名称中不能含有空格",
        check: has_name_whitespace,
        fix: Some(fix_name_whitespace),
    },
    PatternRule {
        id: "missing-assignment",
        severity: Severity::Error,
        message: "缺少赋值符号，点定义应写作 名称=(x,y)",
        check: has_missing_assignment,
        fix: Some(fix_missing_assignment),
    },
    PatternRule {
        id: "empty-arguments",
        severity: Severity::Error,
        message: "命令缺少参数，括号内不能为空",
        check: has_empty_call,
        fix: None,
    },
    PatternRule {
        id: "multiple-decimal-points",
        severity: Severity::Error,
        message: "数字中含有多个小数点",
        check: has_multi_dot_number,
        fix: None,
    },
    PatternRule {
        id: "unclosed-parens",
        severity: Severity::Error,
        message: "括号不匹配，缺少右括号",
        check: has_unclosed_parens,
        fix: Some(fix_unclosed_parens),
    },
];

/// Run every pattern rule plus the shape-specific checks against one
/// command line.
///
/// A rule with a fix only reports when applying the fix actually changes
/// the text; duplicate messages are suppressed.
pub fn check_patterns(command: &str, catalog: &CommandCatalog) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for rule in RULES {
        if !(rule.check)(command, catalog) {
            continue;
        }
        let fixed = rule.fix.map(|f| f(command));
        if let Some(ref fixed) = fixed {
            // No-op fixes are suppressed
            if fixed == command {
                continue;
            }
        }
        if !seen.insert(rule.message) {
            continue;
        }

        let mut issue =
            ValidationIssue::new(rule.severity, rule.message).with_command(command);
        if let Some(fixed) = fixed {
            issue = issue.with_fix(fixed);
        }
        issues.push(issue);
    }

    issues.extend(shape_checks(command, catalog));
    issues
}

/// Apply every rule whose trigger matches, in rule order, to produce a
/// repaired command. Returns the fixed text and the ids of the rules that
/// produced a real change.
pub fn apply_fixes(command: &str, catalog: &CommandCatalog) -> (String, Vec<String>) {
    let mut fixed = command.to_string();
    let mut changes = Vec::new();

    for rule in RULES {
        let fix = match rule.fix {
            Some(fix) => fix,
            None => continue,
        };
        if !(rule.check)(&fixed, catalog) {
            continue;
        }
        let next = fix(&fixed);
        if next != fixed {
            fixed = next;
            changes.push(rule.id.to_string());
        }
    }

    (fixed, changes)
}

// ── Shape-specific checks ─────────────────────────────────────────────

/// Checks tied to particular definition shapes (points, functions,
/// two-point lines) rather than to character-level patterns.
fn shape_checks(command: &str, _catalog: &CommandCatalog) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // Point names start with an uppercase letter: `a=(1,2)` would define
    // something else entirely in the geometry engine.
    if let Some(caps) = LOWERCASE_POINT_RE.captures(command) {
        let name = &caps[1];
        let fixed = capitalize_first(command);
        issues.push(
            ValidationIssue::error(format!("点名称 {} 应以大写字母开头", name))
                .with_command(command)
                .with_suggestion("点的名称必须以大写字母开头，例如 A=(1,2)")
                .with_fix(fixed),
        );
    }

    // `A=Point[1,2]` works but the short form is preferred.
    if let Some(caps) = LONG_POINT_RE.captures(command) {
        let rewrite = format!("{}=({},{})", &caps[1], &caps[2], &caps[3]);
        issues.push(
            ValidationIssue::warning("点定义建议使用简写形式")
                .with_command(command)
                .with_suggestion(format!("可以简写为 {}", rewrite))
                .with_fix(rewrite),
        );
    }

    // Function definitions should only contain the expression alphabet.
    if let Some(caps) = FUNC_DEF_SHAPE_RE.captures(command) {
        let body = &caps[1];
        if let Some(bad) = body
            .chars()
            .find(|&c| !c.is_ascii_alphanumeric() && !"+-*/^().,= \t".contains(c))
        {
            issues.push(
                ValidationIssue::warning(format!("函数定义中含有异常字符 '{}'", bad))
                    .with_command(command)
                    .with_suggestion("函数表达式只能包含数字、字母、运算符和括号"),
            );
        }
    }

    // `Line[A,A]` is degenerate: both endpoints are the same point.
    if let Some(caps) = TWO_POINT_RE.captures(command) {
        if caps[2] == caps[3] {
            issues.push(
                ValidationIssue::error(format!("{} 的两个点不能相同", &caps[1]))
                    .with_command(command),
            );
        }
    }

    issues
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SignatureEntry;
    use pretty_assertions::assert_eq;

    fn catalog() -> CommandCatalog {
        CommandCatalog::from_entries(vec![
            SignatureEntry {
                signature: "Circle( <Point>, <Number> )".to_string(),
                command_base: "Circle".to_string(),
                ..Default::default()
            },
            SignatureEntry {
                signature: "Line( <Point>, <Point> )".to_string(),
                command_base: "Line".to_string(),
                ..Default::default()
            },
        ])
    }

    fn issues_for(command: &str) -> Vec<ValidationIssue> {
        check_patterns(command, &catalog())
    }

    #[test]
    fn fullwidth_parens_are_fixed() {
        let issues = issues_for("Circle（(1,2),3）");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].fixed_command.as_deref(),
            Some("Circle((1,2),3)")
        );
    }

    #[test]
    fn fullwidth_comma_fix_removes_every_occurrence() {
        let (fixed, changes) = apply_fixes("A=(1，2)", &catalog());
        assert_eq!(fixed, "A=(1,2)");
        assert_eq!(changes, vec!["fullwidth-comma"]);
        assert!(!fixed.contains('，'));
    }

    #[test]
    fn missing_coordinate_comma_is_inserted() {
        let issues = issues_for("B=(5 6)");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("B=(5,6)"));
    }

    #[test]
    fn spaced_function_def_is_a_warning() {
        let issues = issues_for("f(x) = sin(x)");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("f(x)=sin(x)"));
    }

    #[test]
    fn tight_function_def_is_clean() {
        assert!(issues_for("f(x)=sin(x)").is_empty());
    }

    #[test]
    fn whitespace_in_object_name() {
        let issues = issues_for("A B=(1,2)");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("AB=(1,2)"));
    }

    #[test]
    fn bare_point_call_gets_assignment() {
        let issues = issues_for("A(1,2)");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("A=(1,2)"));
    }

    #[test]
    fn known_command_is_not_mistaken_for_bare_point() {
        // `Circle(1,2)` is a catalog command call, not a point definition
        assert!(issues_for("Circle(1,2)").is_empty());
    }

    #[test]
    fn empty_argument_list_on_known_command() {
        let issues = issues_for("Line()");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].fixed_command.is_none());
    }

    #[test]
    fn multiple_decimal_points() {
        let issues = issues_for("Circle((0,0),1.2.3)");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fixed_command.is_none());
    }

    #[test]
    fn unclosed_parens_are_appended() {
        let issues = issues_for("Circle((1,2),3");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].fixed_command.as_deref(),
            Some("Circle((1,2),3)")
        );
    }

    #[test]
    fn extra_close_paren_is_not_rule_nine() {
        // More `)` than `(` is outside this rule's scope
        let (_, changes) = apply_fixes("A=1,2)", &catalog());
        assert!(!changes.contains(&"unclosed-parens".to_string()));
    }

    #[test]
    fn lowercase_point_name_is_flagged() {
        let issues = issues_for("a=(1,2)");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("A=(1,2)"));
    }

    #[test]
    fn long_point_form_downgraded_to_warning() {
        let issues = issues_for("A=Point[1,2]");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].fixed_command.as_deref(), Some("A=(1,2)"));
    }

    #[test]
    fn function_def_with_stray_character() {
        let issues = issues_for("f(x)=x^2 @ 3");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains('@'));
    }

    #[test]
    fn same_point_twice_in_line_definition() {
        let issues = issues_for("Line[A,A]");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn distinct_points_are_fine() {
        assert!(issues_for("Line[A,B]").is_empty());
    }

    #[test]
    fn clean_command_produces_no_issues() {
        assert!(issues_for("Circle((1,2),3)").is_empty());
        assert!(issues_for("A=(1,2)").is_empty());
    }
}
