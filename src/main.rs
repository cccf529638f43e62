//! GeoLint CLI
//!
//! Command-line interface for checking, fixing and looking up
//! GeoGebra-style construction commands.

use clap::{Parser, Subcommand};
use colored::*;
use geolint::{
    auto_fix_command, extract_commands, validate_command, validate_commands, validate_script,
    CommandCatalog, Severity, ValidationIssue,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geolint")]
#[command(version = "0.2.1")]
#[command(about = "Structural validator for GeoGebra-style construction commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Command script to check (one command per line)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Use a custom catalog JSON instead of the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a command script for structural issues
    ///
    /// Markdown files are scanned for ```geogebra fenced blocks; any other
    /// file is treated as one command per line.
    Check {
        /// The script file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Auto-fix a command script and print the repaired lines
    Fix {
        /// The script file to fix
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show documentation for a command
    Doc {
        /// Command name, e.g. Circle
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Search commands by name or description
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// List all known command names
    List,
    /// Start an interactive validation prompt
    Repl,
}

fn main() {
    let cli = Cli::parse();

    let catalog = match load_catalog(cli.catalog.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Check { file }) => check_file(&file, catalog),
        Some(Commands::Fix { file }) => fix_file(&file, catalog),
        Some(Commands::Doc { name }) => show_doc(&name, catalog),
        Some(Commands::Search { query }) => search(&query, catalog),
        Some(Commands::List) => list_commands(catalog),
        Some(Commands::Repl) => run_repl(catalog),
        None => {
            if let Some(file) = cli.file {
                check_file(&file, catalog)
            } else {
                run_repl(catalog)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

enum CatalogSource {
    Builtin(&'static CommandCatalog),
    Custom(CommandCatalog),
}

impl std::ops::Deref for CatalogSource {
    type Target = CommandCatalog;

    fn deref(&self) -> &CommandCatalog {
        match self {
            CatalogSource::Builtin(c) => c,
            CatalogSource::Custom(c) => c,
        }
    }
}

fn load_catalog(path: Option<&std::path::Path>) -> anyhow::Result<CatalogSource> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(CatalogSource::Custom(CommandCatalog::from_json(&json)?))
        }
        None => Ok(CatalogSource::Builtin(CommandCatalog::builtin())),
    }
}

/// Read the command lines of a script. Markdown input goes through the
/// fenced-block extractor; everything else is one command per line.
fn read_script(path: &std::path::Path) -> anyhow::Result<Vec<String>> {
    let source = fs::read_to_string(path)?;
    let is_markdown = path
        .extension()
        .map(|ext| ext == "md" || ext == "markdown")
        .unwrap_or(false);

    if is_markdown {
        Ok(extract_commands(&source))
    } else {
        Ok(source.lines().map(|l| l.to_string()).collect())
    }
}

fn check_file(path: &std::path::Path, catalog: CatalogSource) -> anyhow::Result<()> {
    let lines = read_script(path)?;
    let report = validate_script(&lines, &catalog);

    let mut error_count = 0;
    for issue in &report.issues {
        if issue.is_error() {
            error_count += 1;
        }
        print_issue(issue);
    }

    if error_count == 0 {
        println!("{}", "✓ 所有命令通过检查".green());
        Ok(())
    } else {
        println!("{}", format!("✗ 发现 {} 个错误", error_count).red());
        std::process::exit(1);
    }
}

fn fix_file(path: &std::path::Path, catalog: CatalogSource) -> anyhow::Result<()> {
    let lines = read_script(path)?;
    let report = validate_commands(&lines, &catalog);

    match report.fixed_commands {
        Some(fixed) => {
            for line in fixed {
                println!("{}", line);
            }
        }
        None => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn print_issue(issue: &ValidationIssue) {
    let label = match issue.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".cyan().bold(),
    };
    match issue.line {
        Some(line) => println!("{}:{}: {}", line, label, issue.message),
        None => println!("{}: {}", label, issue.message),
    }
    if let Some(command) = &issue.command {
        println!("    {}", command.dimmed());
    }
    if let Some(suggestion) = &issue.suggestion {
        println!("    {} {}", "提示:".cyan(), suggestion);
    }
    if let Some(fixed) = &issue.fixed_command {
        println!("    {} {}", "修正:".green(), fixed);
    }
}

fn show_doc(name: &str, catalog: CatalogSource) -> anyhow::Result<()> {
    let entries = match catalog.help(name) {
        Some(entries) => entries,
        None => {
            println!("{}: 未找到命令 {}", "Error".red(), name);
            std::process::exit(1);
        }
    };

    for entry in entries {
        println!("{}", entry.signature.green().bold());
        if !entry.description.is_empty() {
            println!("  {}", entry.description);
        }
        for example in &entry.examples {
            println!("  {} {}", "例:".cyan(), example.command);
            if !example.description.is_empty() {
                println!("      {}", example.description.dimmed());
            }
        }
        if !entry.note.is_empty() {
            println!("  {} {}", "注:".yellow(), entry.note);
        }
        println!();
    }
    Ok(())
}

fn search(query: &str, catalog: CatalogSource) -> anyhow::Result<()> {
    let results = catalog.search(query);
    if results.is_empty() {
        println!("未找到匹配 {:?} 的命令", query);
        return Ok(());
    }
    for entry in results {
        println!("{}  {}", entry.signature.green(), entry.description.dimmed());
    }
    Ok(())
}

fn list_commands(catalog: CatalogSource) -> anyhow::Result<()> {
    for name in catalog.all_command_names() {
        println!("{}", name);
    }
    Ok(())
}

fn run_repl(catalog: CatalogSource) -> anyhow::Result<()> {
    println!("{}", "GeoLint — 命令检查器".green().bold());
    println!("输入命令进行检查，{} 退出\n", ":quit".cyan());

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "geolint>".blue().bold()));
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" | ":exit" => break,
                        ":list" => {
                            for name in catalog.all_command_names() {
                                println!("{}", name);
                            }
                            continue;
                        }
                        _ => {
                            println!("{}: 未知 REPL 命令: {}", "Error".red(), line);
                            continue;
                        }
                    }
                }

                let issues = validate_command(line, &catalog);
                if issues.is_empty() {
                    println!("{}", "✓".green());
                } else {
                    for issue in &issues {
                        print_issue(issue);
                    }
                    let fix = auto_fix_command(line, &catalog);
                    if !fix.changes.is_empty() {
                        println!("{} {}", "自动修正:".green(), fix.fixed);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    Ok(())
}
