//! Token replacement with tiered search
//!
//! The host's structural search does not always see the same characters as
//! its plain-text extraction. Each unique token is therefore looked up in up
//! to three tiers, stopping at the first that finds anything:
//!
//! 1. exact: the trimmed token, case-insensitive substring
//! 2. normalized: dash/space-unified form, punctuation- and
//!    whitespace-insensitive (skipped when identical to the exact form)
//! 3. simplified: the category's simplifier output, same leniency
//!
//! A token that no tier finds is skipped.

use std::collections::HashSet;

use shroud_core::Token;
use shroud_document::{BodyTarget, Document, RangeId, Result, SearchOptions};
use shroud_security::{Simplifier, normalize_token};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Ranges replaced, one per occurrence
    pub replaced: usize,
    /// Unique non-empty token values
    pub distinct: usize,
    pub exact_hits: usize,
    pub normalized_hits: usize,
    pub simplified_hits: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Exact,
    Normalized,
    Simplified,
}

/// Trimmed, non-empty token values in first-occurrence order
fn unique_values(tokens: &[Token]) -> Vec<&str> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .map(|token| token.value.trim())
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .collect()
}

async fn locate(
    doc: &dyn Document,
    target: BodyTarget,
    exact: &str,
    simplify: Option<Simplifier>,
) -> Result<Option<(Tier, Vec<RangeId>)>> {
    let ranges = doc.search(target, exact, SearchOptions::literal()).await?;
    if !ranges.is_empty() {
        return Ok(Some((Tier::Exact, ranges)));
    }

    let normalized = normalize_token(exact);
    if normalized != exact {
        let ranges = doc
            .search(target, &normalized, SearchOptions::lenient())
            .await?;
        if !ranges.is_empty() {
            return Ok(Some((Tier::Normalized, ranges)));
        }
    }

    if let Some(simplify) = simplify {
        let simplified = simplify(exact);
        if !simplified.is_empty() {
            let ranges = doc
                .search(target, &simplified, SearchOptions::lenient())
                .await?;
            if !ranges.is_empty() {
                return Ok(Some((Tier::Simplified, ranges)));
            }
        }
    }

    Ok(None)
}

/// Replace every occurrence of every unique token in `target` with `marker`
pub async fn replace_tokens(
    doc: &dyn Document,
    target: BodyTarget,
    tokens: &[Token],
    marker: &str,
    simplify: Option<Simplifier>,
) -> Result<ReplaceOutcome> {
    let values = unique_values(tokens);
    let mut outcome = ReplaceOutcome {
        distinct: values.len(),
        ..ReplaceOutcome::default()
    };

    for value in values {
        let Some((tier, ranges)) = locate(doc, target, value, simplify).await? else {
            debug!(token_len = value.len(), "Token not found in any search tier");
            outcome.unmatched += 1;
            continue;
        };

        match tier {
            Tier::Exact => outcome.exact_hits += 1,
            Tier::Normalized => outcome.normalized_hits += 1,
            Tier::Simplified => outcome.simplified_hits += 1,
        }
        debug!(?tier, ranges = ranges.len(), "Replacing token occurrences");

        for range in ranges {
            doc.replace(range, marker).await?;
            outcome.replaced += 1;
        }
    }

    Ok(outcome)
}
