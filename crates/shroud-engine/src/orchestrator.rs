//! Runs every classifier in order and replaces what each one finds

use shroud_core::{HostCapabilities, RedactionCounts, SensitiveCategory};
use shroud_document::{BodyTarget, Document};
use shroud_security::{Classifier, simplifier_for};
use tracing::{debug, warn};

use crate::replacer::replace_tokens;
use crate::{Result, RunError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionReport {
    pub counts: RedactionCounts,
    pub total: usize,
    /// Same value as `total`; see [`shroud_core::RunSummary::unique_found`]
    pub unique_found: usize,
    pub distinct_tokens: usize,
    pub mailto_links_removed: usize,
    pub notes: Vec<String>,
}

pub struct RedactionOrchestrator {
    classifier: Classifier,
}

impl RedactionOrchestrator {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Classify-then-replace one category at a time, in
    /// [`SensitiveCategory::RUN_ORDER`].
    ///
    /// The body text is re-read before each category, so later classifiers
    /// only see what earlier ones left unredacted.
    pub async fn run(
        &self,
        doc: &dyn Document,
        capabilities: HostCapabilities,
    ) -> Result<RedactionReport> {
        let mut report = RedactionReport::default();

        for category in SensitiveCategory::RUN_ORDER {
            let text = doc
                .text(BodyTarget::Main)
                .await
                .map_err(|source| RunError::Redaction { category, source })?;

            let tokens = self.classifier.classify(category, &text);
            if tokens.is_empty() {
                continue;
            }

            let outcome = replace_tokens(
                doc,
                BodyTarget::Main,
                &tokens,
                category.marker(),
                simplifier_for(category),
            )
            .await
            .map_err(|source| RunError::Redaction { category, source })?;

            debug!(
                %category,
                found = tokens.len(),
                distinct = outcome.distinct,
                replaced = outcome.replaced,
                unmatched = outcome.unmatched,
                "Category processed"
            );

            report.counts.add(category, outcome.replaced);
            report.distinct_tokens += outcome.distinct;
        }

        report.total = report.counts.total();
        report.unique_found = report.total;
        report.mailto_links_removed = self
            .remove_mailto_links(doc, capabilities, &mut report.notes)
            .await;

        Ok(report)
    }

    /// Unwrap `mailto:` hyperlinks in the body.
    ///
    /// The link address keeps the original email even after its display text
    /// is replaced. Best effort: every failure becomes a note.
    async fn remove_mailto_links(
        &self,
        doc: &dyn Document,
        capabilities: HostCapabilities,
        notes: &mut Vec<String>,
    ) -> usize {
        if !capabilities.hyperlinks {
            notes.push(
                "Email link cleanup skipped: hyperlink API not supported by this host.".to_string(),
            );
            return 0;
        }

        let links = match doc.hyperlinks(BodyTarget::Main).await {
            Ok(links) => links,
            Err(e) => {
                warn!(error = %e, "Could not enumerate hyperlinks");
                notes.push(format!("Email link cleanup skipped: {}", e));
                return 0;
            }
        };

        let mut removed = 0;
        for link in links {
            let is_mailto = link
                .address
                .trim_start()
                .get(..7)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"));
            if !is_mailto {
                continue;
            }

            match doc.remove_hyperlink(link.id).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(error = %e, "Could not remove email hyperlink");
                    notes.push(format!("Could not remove an email link: {}", e));
                }
            }
        }

        removed
    }
}

impl Default for RedactionOrchestrator {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}
