//! GeoLint — structural validator for GeoGebra-style construction commands
//!
//! Parses documented command signatures (e.g. `Circle( <Point>, <Number> )`)
//! into a typed parameter model, parses candidate command lines into
//! name+argument lists, checks arity against every documented overload, and
//! runs a second, pattern-based lint layer with deterministic auto-fixes.

pub mod call;
pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod patterns;
pub mod signature;
pub mod suggest;
pub mod validator;

pub use catalog::{CommandCatalog, CommandExample, SignatureEntry};
pub use diagnostics::{Severity, ValidationIssue};
pub use error::{GeoLintError, Result};
pub use validator::{
    auto_fix_command, extract_commands, validate_command, validate_command_syntax,
    validate_commands, validate_commands_batch, validate_script, AutoFix, BatchReport,
    PatternReport,
};
