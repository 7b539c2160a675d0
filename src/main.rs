//! regula CLI: propositional rule engine with an interactive rule graph.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use regula::atom::Atom;
use regula::config::{Config, InitialInputs};
use regula::export::{FactsExport, LayoutExport};
use regula::infer::InferenceEngine;
use regula::kb::KnowledgeBase;
use regula::layout::{GlyphSet, GlyphStyle, layout};
use regula::render;
use regula::rule::{load_rules, parse_premise};

#[derive(Parser)]
#[command(name = "regula", version, about = "Propositional forward-chaining rule engine")]
struct Cli {
    /// Rule file (one `A & !B -> R` rule per line). Defaults to the example base.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Draw connectors with ASCII characters.
    #[arg(long, global = true)]
    ascii: bool,

    /// Log inference and layout details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rule graph, then the facts before and after inference.
    Print {
        /// Initial facts (comma-separated, `!X` for an explicit negative fact).
        /// Defaults to every input.
        #[arg(long)]
        facts: Option<String>,
    },

    /// Run inference and list derived facts.
    Infer {
        /// Initial facts (comma-separated, `!X` for an explicit negative fact).
        #[arg(long, default_value = "")]
        facts: String,
    },

    /// Open the interactive session.
    Tui {
        /// Skip the start menu and open the graph with inputs set this way.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Export engine data as JSON.
    Export {
        #[command(subcommand)]
        action: ExportAction,
    },
}

#[derive(Subcommand)]
enum ExportAction {
    /// Export the layout model.
    Layout,
    /// Export facts after inference.
    Facts {
        /// Initial facts (comma-separated). Defaults to every input.
        #[arg(long)]
        facts: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Every input on.
    On,
    /// Every input off.
    Off,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.ascii {
        config.glyphs = GlyphStyle::Ascii;
    }
    let glyphs = GlyphSet::for_style(config.glyphs);
    let kb = load_kb(cli.rules.as_deref())?;
    let engine = InferenceEngine::new(config.inference());

    match cli.command {
        Commands::Print { facts } => {
            let seeds = seeds_or_inputs(&kb, facts.as_deref())?;
            println!("\nKnowledge base:");
            print!("{}", render::render_text(&layout(&kb), &glyphs));

            let (after, _report) = engine.infer(&kb, seeds.clone());
            println!("Before inference:");
            print!("{}", render::render_facts(&seeds.into_iter().collect()));
            println!("\nAfter inference:");
            print!("{}", render::render_facts(&after));
        }

        Commands::Infer { facts } => {
            let seeds = parse_facts(&facts)?;
            let (after, report) = engine.infer(&kb, seeds);
            if report.derived.is_empty() {
                println!("Nothing derived.");
            } else {
                println!("Derived ({} passes):", report.passes);
                for d in &report.derived {
                    println!("  pass {}: {}", d.pass, d.conclusion);
                }
            }
            if !report.reached_fixpoint {
                println!("(stopped at the pass cap before reaching a fixpoint)");
            }
            print!("{}", render::render_facts(&after));
        }

        Commands::Tui { mode } => match mode {
            Some(mode) => {
                config.initial_inputs = match mode {
                    ModeArg::On => InitialInputs::AllOn,
                    ModeArg::Off => InitialInputs::AllOff,
                };
                regula::tui::launch_graph(kb, config)?;
            }
            None => regula::tui::launch(kb, config)?,
        },

        Commands::Export { action } => match action {
            ExportAction::Layout => {
                let export = LayoutExport::new(&kb, &layout(&kb), &glyphs);
                let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
                println!("{json}");
            }
            ExportAction::Facts { facts } => {
                let seeds = seeds_or_inputs(&kb, facts.as_deref())?;
                let (after, report) = engine.infer(&kb, seeds);
                let export = FactsExport::new(&after, &report);
                let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
                println!("{json}");
            }
        },
    }

    Ok(())
}

/// Load rules from `path`, or fall back to the example base.
fn load_kb(path: Option<&Path>) -> Result<KnowledgeBase> {
    let Some(path) = path else {
        return Ok(KnowledgeBase::example()?);
    };
    let rules = load_rules(path)?;
    let kb = KnowledgeBase::from_rules(rules)?;
    tracing::info!(path = %path.display(), rules = kb.len(), "loaded rule file");
    Ok(kb)
}

/// Parse a comma-separated fact list such as `A,B,!C`.
fn parse_facts(text: &str) -> Result<Vec<Atom>> {
    let mut atoms = Vec::new();
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        atoms.push(parse_premise(token)?);
    }
    Ok(atoms)
}

/// Parse `text`, or default to every input of `kb` set true.
fn seeds_or_inputs(kb: &KnowledgeBase, text: Option<&str>) -> Result<Vec<Atom>> {
    match text {
        Some(text) => parse_facts(text),
        None => Ok(kb
            .variables()
            .into_iter()
            .filter_map(|name| Atom::positive(name).ok())
            .collect()),
    }
}
