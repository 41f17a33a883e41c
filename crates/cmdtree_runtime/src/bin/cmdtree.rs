//! cmdtree CLI entry point.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use cmdtree_engine::{MatchOutcome, Matcher, RecordLayout};
use cmdtree_grammar::{Compilation, Diagnostic, Error, Result};
use cmdtree_runtime::{
    RecordWriter, Repl, RuntimeConfig, VerificationReport, load_rule_set, logging,
    save_descriptor, save_syntax,
};

/// Exit code when some input line matched no rule.
const EXIT_UNMATCHED: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "cmdtree", version)]
#[command(about = "Compile command-grammar tables and match command lines against them")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Record layout: tokens, nested or flat.
    #[arg(long, short = 'l', global = true)]
    layout: Option<RecordLayout>,

    /// Omit the input line from records.
    #[arg(long, global = true)]
    no_raw: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a grammar table into a rule-set descriptor.
    Compile {
        /// Grammar table (.csv or .tsv).
        table: PathBuf,
        /// Output descriptor (.json, or .msgpack for MessagePack).
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Also write one `verb object template` line per rule here.
        #[arg(long)]
        syntax: Option<PathBuf>,
    },
    /// Match a single command line.
    Parse {
        /// Grammar table or descriptor.
        #[arg(long, short = 'r')]
        rules: PathBuf,
        /// The command line to match.
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
    },
    /// Match every line of a file and write JSON lines.
    Batch {
        /// Grammar table or descriptor.
        #[arg(long, short = 'r')]
        rules: PathBuf,
        /// Input log; stdin when omitted.
        input: Option<PathBuf>,
        /// Output file; stdout when omitted.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Check that a batch output reconstructs its input log.
    Verify {
        /// The input log.
        log: PathBuf,
        /// The JSON-lines output produced from it.
        output: PathBuf,
    },
    /// Match lines interactively.
    Repl {
        /// Grammar table or descriptor.
        #[arg(long, short = 'r')]
        rules: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(context) = &e.context {
                eprintln!("  at {context}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(layout) = cli.layout {
        config = config.with_layout(layout);
    }
    if cli.no_raw {
        config = config.with_include_raw(false);
    }
    Ok(config)
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn load(rules: &Path, config: &RuntimeConfig) -> Result<Compilation> {
    let compilation = load_rule_set(rules, config)?;
    report(&compilation.diagnostics);
    Ok(compilation)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Compile {
            table,
            output,
            syntax,
        } => {
            let compilation = load(table, &config)?;
            save_descriptor(&compilation.rules.to_descriptor(), output)?;
            info!(rules = compilation.rules.len(), output = %output.display(), "wrote descriptor");
            if let Some(path) = syntax {
                let lines = save_syntax(&compilation.rules, path)?;
                info!(lines, output = %path.display(), "wrote syntax listing");
            }
            eprintln!(
                "compiled {} rules ({} diagnostics) to {}",
                compilation.rules.len(),
                compilation.diagnostics.len(),
                output.display()
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Parse { rules, line } => {
            let compilation = load(rules, &config)?;
            let line = line.join(" ");
            match Matcher::new(&compilation.rules).match_line(&line) {
                MatchOutcome::Matched(record) => {
                    let value = config.layout.render(&record, config.include_raw);
                    let text = serde_json::to_string_pretty(&value)
                        .map_err(|e| Error::serialization(e.to_string()))?;
                    println!("{text}");
                    Ok(ExitCode::SUCCESS)
                }
                MatchOutcome::Unmatched(unmatched) => {
                    eprintln!("no rule matches {:?}", unmatched.raw);
                    Ok(ExitCode::from(EXIT_UNMATCHED))
                }
            }
        }

        Command::Batch {
            rules,
            input,
            output,
        } => {
            let compilation = load(rules, &config)?;
            let text = match input {
                Some(path) => fs::read_to_string(path).map_err(|e| {
                    Error::io(format!("failed to read '{}': {e}", path.display()))
                })?,
                None => {
                    let mut text = String::new();
                    io::stdin()
                        .read_to_string(&mut text)
                        .map_err(|e| Error::io(e.to_string()))?;
                    text
                }
            };

            let out: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(fs::File::create(path).map_err(|e| {
                    Error::io(format!("failed to create '{}': {e}", path.display()))
                })?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };

            let matcher =
                Matcher::new(&compilation.rules).with_comment_prefix(config.comment_prefix.clone());
            let batch = matcher.match_lines(text.lines());
            let mut writer = RecordWriter::new(out, config.layout, config.include_raw);
            for record in batch.records() {
                writer.write(record)?;
            }
            writer.finish()?;

            report(&batch.diagnostics);
            eprintln!(
                "{} lines: {} matched, {} unmatched",
                batch.considered(),
                batch.matched(),
                batch.unmatched()
            );
            if batch.unmatched() > 0 {
                Ok(ExitCode::from(EXIT_UNMATCHED))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Command::Verify { log, output } => {
            let report = VerificationReport::from_files(
                log,
                output,
                &config.comment_prefix,
                config.case_insensitive,
            )?;
            println!("{report}");
            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Repl { rules } => {
            let compilation = load(rules, &config)?;
            Repl::new(&compilation.rules, &config)?.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
