//! Validation entry points: catalog-based arity checking, the batch
//! validator, and auto-fix assembly.
//!
//! Two independently layered checkers run over each command line. The
//! catalog layer parses the line as a command call and matches it against
//! every documented overload's arity. The pattern layer (see `patterns`)
//! lints the raw text. When the catalog layer finds an error, the pattern
//! layer is skipped for that line so a clearly-broken call does not also
//! drown in cosmetic findings.

use lazy_static::lazy_static;
use regex::Regex;

use crate::call::{parse_command_call, ParsedCall};
use crate::catalog::CommandCatalog;
use crate::diagnostics::ValidationIssue;
use crate::patterns;
use crate::signature::parse_signature;
use crate::suggest::find_similar;

/// How many spelling suggestions to offer for an unknown command name
const MAX_SUGGESTIONS: usize = 3;

/// Localized "or" joiner used when listing alternative signatures
const OR_SEPARATOR: &str = " 或 ";

lazy_static! {
    static ref FENCE_RE: Regex = Regex::new(r"(?s)```geogebra[^\n]*\n(.*?)```").unwrap();
}

/// Result of the catalog-only batch path
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub issues: Vec<ValidationIssue>,
    pub is_valid: bool,
}

/// Result of the pattern-engine batch path
#[derive(Debug, Clone, PartialEq)]
pub struct PatternReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// One entry per input line, populated only when at least one issue
    /// was found anywhere in the batch
    pub fixed_commands: Option<Vec<String>>,
}

/// Result of applying every matching auto-fix rule to one command
#[derive(Debug, Clone, PartialEq)]
pub struct AutoFix {
    pub fixed: String,
    /// Ids of the rules that produced a real change, in application order
    pub changes: Vec<String>,
}

// ── Catalog-based checking ────────────────────────────────────────────

/// Check one command against the catalog only: unknown-name detection and
/// arity matching across overloads. Lines that are not function calls
/// produce no issues — there is nothing to structurally validate.
pub fn validate_command_syntax(
    command: &str,
    catalog: &CommandCatalog,
) -> Vec<ValidationIssue> {
    let call = match parse_command_call(command) {
        Some(call) => call,
        None => return Vec::new(),
    };

    if !catalog.is_valid_command(&call.name) {
        let similar = find_similar(&call.name, &catalog.all_command_names(), MAX_SUGGESTIONS);
        let suggestion = if similar.is_empty() {
            "请检查命令拼写是否正确".to_string()
        } else {
            format!("您是想输入 {} 吗？", similar.join(OR_SEPARATOR))
        };
        return vec![ValidationIssue::error(format!("未知命令: {}", call.name))
            .with_command(command)
            .with_suggestion(suggestion)];
    }

    match_overloads(&call, command, catalog)
}

/// First-arity-fit overload matching. No type checking of arguments is
/// attempted: a signature accepts the call iff
/// `required_count <= argc <= total_count`.
fn match_overloads(
    call: &ParsedCall,
    command: &str,
    catalog: &CommandCatalog,
) -> Vec<ValidationIssue> {
    let entries = catalog.signatures(&call.name);
    let argc = call.args.len();

    let mut last_mismatch: Option<String> = None;
    let mut matched = false;

    for entry in &entries {
        let sig = parse_signature(&entry.signature);
        // Prose-only signature text degrades to {name: raw, params: []};
        // there is no arity to check against, so the entry is skipped
        // rather than mistaken for a zero-arity command.
        if sig.params.is_empty() && sig.name == entry.signature {
            continue;
        }
        let required = sig.required_count();
        let total = sig.total_count();

        if argc < required {
            last_mismatch = Some(format!(
                "参数不足：{} 至少需要 {} 个参数，当前提供了 {} 个",
                call.name, required, argc
            ));
        } else if argc > total {
            last_mismatch = Some(format!(
                "参数过多：{} 最多接受 {} 个参数，当前提供了 {} 个",
                call.name, total, argc
            ));
        } else {
            matched = true;
            break;
        }
    }

    let all_signatures = || {
        entries
            .iter()
            .map(|e| e.signature.clone())
            .collect::<Vec<_>>()
            .join(OR_SEPARATOR)
    };

    let mut issues = Vec::new();
    if !matched {
        if let Some(message) = last_mismatch {
            issues.push(
                ValidationIssue::error(message)
                    .with_command(command)
                    .with_suggestion(format!("正确用法：{}", all_signatures())),
            );
        }
    } else if entries.len() > 1 {
        issues.push(
            ValidationIssue::info(format!(
                "{} 有 {} 种不同用法",
                call.name,
                entries.len()
            ))
            .with_command(command)
            .with_suggestion(all_signatures()),
        );
    }
    issues
}

/// Full single-command check: catalog layer first, and only when it found
/// no error the pattern layer as well.
pub fn validate_command(command: &str, catalog: &CommandCatalog) -> Vec<ValidationIssue> {
    let mut issues = validate_command_syntax(command, catalog);
    if issues.iter().any(|i| i.is_error()) {
        return issues;
    }
    issues.extend(patterns::check_patterns(command, catalog));
    issues
}

// ── Batch validation ──────────────────────────────────────────────────

/// Strip an inline `#` or `//` comment, whichever starts earlier.
fn strip_inline_comment(line: &str) -> &str {
    let hash = line.find('#');
    let slashes = line.find("//");
    match (hash, slashes) {
        (Some(h), Some(s)) => &line[..h.min(s)],
        (Some(h), None) => &line[..h],
        (None, Some(s)) => &line[..s],
        (None, None) => line,
    }
}

/// Returns the checkable code of a line, or `None` for blank lines and
/// full-line comments.
fn checkable_code(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return None;
    }
    let code = strip_inline_comment(trimmed).trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Catalog-only batch path: arity-check every line, attach 1-based line
/// numbers, report overall validity.
pub fn validate_commands_batch(lines: &[String], catalog: &CommandCatalog) -> BatchReport {
    let mut issues = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let code = match checkable_code(line) {
            Some(code) => code,
            None => continue,
        };
        for mut issue in validate_command_syntax(code, catalog) {
            issue.line = Some(idx + 1);
            issues.push(issue);
        }
    }

    let is_valid = !issues.iter().any(|i| i.is_error());
    BatchReport { issues, is_valid }
}

/// Combined per-line path for whole scripts: catalog layer first, pattern
/// layer when the catalog layer found no error, 1-based line numbers
/// attached. Blank lines and comments are skipped like in the other batch
/// paths.
pub fn validate_script(lines: &[String], catalog: &CommandCatalog) -> BatchReport {
    let mut issues = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let code = match checkable_code(line) {
            Some(code) => code,
            None => continue,
        };
        for mut issue in validate_command(code, catalog) {
            issue.line = Some(idx + 1);
            issues.push(issue);
        }
    }

    let is_valid = !issues.iter().any(|i| i.is_error());
    BatchReport { issues, is_valid }
}

/// Pattern-engine batch path: lint every line and assemble the auto-fixed
/// line list. `fixed_commands` is only populated when at least one issue
/// exists anywhere in the batch.
pub fn validate_commands(lines: &[String], catalog: &CommandCatalog) -> PatternReport {
    let mut issues = Vec::new();
    let mut fixed_lines: Vec<String> = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let code = match checkable_code(line) {
            Some(code) => code,
            None => {
                fixed_lines.push(line.clone());
                continue;
            }
        };

        let line_issues = patterns::check_patterns(code, catalog);
        let fixed = line_issues
            .iter()
            .find(|i| i.is_error() && i.fixed_command.is_some())
            .and_then(|i| i.fixed_command.clone());
        fixed_lines.push(fixed.unwrap_or_else(|| line.clone()));

        for mut issue in line_issues {
            issue.line = Some(idx + 1);
            issues.push(issue);
        }
    }

    let is_valid = !issues.iter().any(|i| i.is_error());
    let fixed_commands = if issues.is_empty() {
        None
    } else {
        Some(fixed_lines)
    };

    PatternReport {
        is_valid,
        issues,
        fixed_commands,
    }
}

/// Apply every matching auto-fix rule to one command, in rule order.
pub fn auto_fix_command(command: &str, catalog: &CommandCatalog) -> AutoFix {
    let (fixed, changes) = patterns::apply_fixes(command, catalog);
    AutoFix { fixed, changes }
}

// ── Command extraction ────────────────────────────────────────────────

/// Pull command lines out of every ```` ```geogebra ```` fenced block in a
/// text, trimming each line and discarding comment lines.
pub fn extract_commands(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    for caps in FENCE_RE.captures_iter(text) {
        for line in caps[1].lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            commands.push(line.to_string());
        }
    }
    commands
}
