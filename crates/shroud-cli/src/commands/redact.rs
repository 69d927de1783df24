use anyhow::{Context, Result};
use shroud_config::Config;
use shroud_core::{RunOptions, RunSummary};
use shroud_document::{DocumentSnapshot, HostQuirks, MemoryDocument};
use shroud_engine::{Redactor, RunSettings};
use shroud_security::ClassifierOptions;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::cli::RedactArgs;
use crate::commands::load_config;

pub async fn handle(args: RedactArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let options = run_options(&config, &args);

    let snapshot = DocumentSnapshot::load(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let capabilities = config.capabilities();
    let doc = MemoryDocument::from_snapshot(snapshot)
        .with_capabilities(capabilities)
        .with_quirks(HostQuirks {
            literal_special_glyphs: config.host.literal_special_glyphs,
        });

    let redactor = Redactor::new(settings(&config));
    let summary = match redactor.run(&doc, options, capabilities).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ Redaction failed: {}", e);
            if let Some(diagnostics) = e.diagnostics() {
                eprintln!("  Diagnostics: {}", serde_json::to_string_pretty(diagnostics)?);
            }
            eprintln!("  Edits made before the failure were not saved.");
            return Err(e.into());
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    doc.to_snapshot()
        .await
        .save(&output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{}", summary);
        println!("\n✓ Wrote {}", output.display());
    }

    if args.copy {
        copy_to_clipboard(&summary);
    }

    Ok(())
}

fn run_options(config: &Config, args: &RedactArgs) -> RunOptions {
    let defaults = config.run_options();
    RunOptions {
        insert_header: args.insert_header.unwrap_or(defaults.insert_header),
        enable_tracking: args.enable_tracking.unwrap_or(defaults.enable_tracking),
    }
}

fn settings(config: &Config) -> RunSettings {
    RunSettings {
        banner: config.banner.clone(),
        classifier: ClassifierOptions {
            card_luhn_check: config.classifiers.card_luhn_check,
        },
    }
}

/// `notes.txt` becomes `notes.redacted.txt` next to the input
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}.redacted.{}", stem, ext.to_string_lossy()),
        None => format!("{}.redacted", stem),
    };
    input.with_file_name(name)
}

fn copy_to_clipboard(summary: &RunSummary) {
    let result = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(summary.to_string()));
    match result {
        Ok(()) => println!("✓ Summary copied to clipboard"),
        Err(e) => warn!("Failed to copy summary to clipboard: {}", e),
    }
}
