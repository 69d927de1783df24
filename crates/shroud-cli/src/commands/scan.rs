use anyhow::{Context, Result};
use shroud_core::{SensitiveCategory, Token};
use shroud_document::{BodyTarget, Document, DocumentSnapshot, MemoryDocument};
use shroud_security::{Classifier, ClassifierOptions};

use crate::cli::ScanArgs;
use crate::commands::load_config;

pub async fn handle(args: ScanArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let snapshot = DocumentSnapshot::load(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    // Classify what the host's text extraction sees, not the raw file
    let text = MemoryDocument::from_snapshot(snapshot)
        .text(BodyTarget::Main)
        .await?;

    let classifier = Classifier::new(ClassifierOptions {
        card_luhn_check: config.classifiers.card_luhn_check,
    });
    let findings = filter(classifier.scan(&text), args.only);

    if args.json {
        let tokens: Vec<&Token> = findings.iter().flat_map(|(_, tokens)| tokens).collect();
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    if findings.is_empty() {
        println!("No sensitive strings found.");
        return Ok(());
    }

    for (category, tokens) in &findings {
        println!("{} ({}):", category.label(), tokens.len());
        for token in tokens {
            println!("  {}", token.value);
        }
    }

    Ok(())
}

fn filter(
    findings: Vec<(SensitiveCategory, Vec<Token>)>,
    only: Option<SensitiveCategory>,
) -> Vec<(SensitiveCategory, Vec<Token>)> {
    findings
        .into_iter()
        .filter(|(category, tokens)| !tokens.is_empty() && only.is_none_or(|c| c == *category))
        .collect()
}
