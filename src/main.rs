//! Script runner for the formula editing engine
//!
//! Replays a YAML key script and prints the published result after each step.
//!
//! Usage:
//!   formula-editor samples/script.yaml --catalog samples/catalog.json
//!   formula-editor samples/script.yaml --catalog samples/catalog.json --json

use anyhow::{Context, Result};
use clap::Parser;

use formula_editor::catalog::StaticCatalog;
use formula_editor::cli::{CliArgs, OutputMode};
use formula_editor::config::EngineConfig;
use formula_editor::processor::{KeyProcessor, ProcessResult, Session};
use formula_editor::script::{Script, ScriptStep};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn describe(step: &ScriptStep) -> String {
    if let Some(key) = &step.key {
        format!("key {}", key)
    } else if let Some(keys) = &step.keys {
        format!("keys {:?}", keys)
    } else if let Some(text) = &step.paste {
        format!("paste {:?}", text)
    } else if let Some(identity) = &step.pick {
        format!("pick {}", identity)
    } else {
        "empty".to_string()
    }
}

fn print_result(mode: OutputMode, index: usize, step: &ScriptStep, result: &ProcessResult) -> Result<()> {
    match mode {
        OutputMode::Json => {
            let json = serde_json::to_string(result).context("serializing result")?;
            println!("{}", json);
        }
        OutputMode::Text => {
            println!(
                "#{} {} -> caret {} ({})",
                index + 1,
                describe(step),
                result.caret,
                result.position
            );
            for line in result.render_lines() {
                println!("  {}", line);
            }
            if let Some(request) = &result.autocomplete {
                println!("  autocomplete {:?}", request.title_prefix);
                for item in &result.suggestions {
                    println!("    {} [{}]", item.title, item.kind);
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    formula_editor::tracing::init();

    let args = CliArgs::parse();
    let mode = args.output_mode();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let catalog = match &args.catalog {
        Some(path) => StaticCatalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => StaticCatalog::new(Vec::new()),
    };

    let script = Script::load(&args.script)
        .with_context(|| format!("loading script {}", args.script.display()))?;

    let mut session =
        Session::new(KeyProcessor::new(config)).with_catalog(Box::new(catalog.clone()));

    let mut printed = Ok(());
    let last = script.len().saturating_sub(1);
    let results = script
        .run(&mut session, &catalog, |index, step, result| {
            if printed.is_ok() && (!args.quiet || index == last) {
                printed = print_result(mode, index, step, result);
            }
        })
        .with_context(|| format!("replaying {}", args.script.display()))?;
    printed?;

    if results.is_empty() {
        eprintln!("Script {} has no steps", args.script.display());
    }

    Ok(())
}
