//! Change tracking and the confidentiality banner

use shroud_core::{BannerPlacement, HostCapabilities};
use shroud_document::{BodyTarget, Document, DocumentError, InsertLocation};
use shroud_security::normalize_token;
use tracing::{info, warn};

use crate::{Result, RunError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingOutcome {
    pub enabled: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderOutcome {
    /// Banner added to a section header during this call
    pub inserted: bool,
    pub placement: BannerPlacement,
    pub notes: Vec<String>,
}

/// Switch the host into tracked-changes mode if asked and supported
pub async fn apply_tracking(
    doc: &dyn Document,
    capabilities: HostCapabilities,
    requested: bool,
) -> Result<TrackingOutcome> {
    if !requested {
        return Ok(TrackingOutcome::default());
    }

    if !capabilities.change_tracking {
        warn!("Change tracking not supported by host");
        return Ok(TrackingOutcome {
            enabled: false,
            note: Some(
                "Track changes is not supported by this host; continuing without tracking."
                    .to_string(),
            ),
        });
    }

    match doc.set_change_tracking(true).await {
        Ok(()) => {
            info!("Change tracking enabled");
            Ok(TrackingOutcome {
                enabled: true,
                note: None,
            })
        }
        Err(e) if e.is_unsupported() => {
            warn!(error = %e, "Host rejected change tracking");
            Ok(TrackingOutcome {
                enabled: false,
                note: Some(format!("Track changes could not be enabled: {}", e)),
            })
        }
        Err(e) => Err(RunError::Tracking(e)),
    }
}

fn contains_banner(text: &str, banner: &str) -> bool {
    let banner = normalize_token(banner).to_lowercase();
    !banner.is_empty() && normalize_token(text).to_lowercase().contains(&banner)
}

/// Why the header could not take the banner
enum HeaderUnavailable {
    Unsupported(String),
    AlreadyPresent,
}

async fn try_header(doc: &dyn Document, banner: &str) -> Result<Option<HeaderUnavailable>> {
    let sections = match doc.section_count().await {
        Ok(0) => {
            return Ok(Some(HeaderUnavailable::Unsupported(
                "the document has no sections".to_string(),
            )));
        }
        Ok(n) => n,
        Err(e) if e.is_unsupported() => {
            return Ok(Some(HeaderUnavailable::Unsupported(e.to_string())));
        }
        Err(e) => return Err(RunError::Header(e)),
    };

    for index in 0..sections {
        match doc.text(BodyTarget::PrimaryHeader(index)).await {
            Ok(text) if contains_banner(&text, banner) => {
                return Ok(Some(HeaderUnavailable::AlreadyPresent));
            }
            Ok(_) => {}
            Err(e) => return unavailable_or_fail(e),
        }
    }

    match doc
        .insert_paragraph(BodyTarget::PrimaryHeader(0), banner, InsertLocation::End)
        .await
    {
        Ok(()) => Ok(None),
        Err(e) => unavailable_or_fail(e),
    }
}

fn unavailable_or_fail(e: DocumentError) -> Result<Option<HeaderUnavailable>> {
    if e.is_unsupported() {
        Ok(Some(HeaderUnavailable::Unsupported(e.to_string())))
    } else {
        Err(RunError::Header(e))
    }
}

async fn insert_body_banner(doc: &dyn Document, banner: &str, reason: &str) -> Result<HeaderOutcome> {
    let body = doc.text(BodyTarget::Main).await.map_err(RunError::Header)?;
    let first_line = body.trim_start().lines().next().unwrap_or_default();

    if contains_banner(first_line, banner) {
        return Ok(HeaderOutcome {
            inserted: false,
            placement: BannerPlacement::None,
            notes: vec![format!(
                "Header unavailable ({}); banner already present at the top of the body.",
                reason
            )],
        });
    }

    doc.insert_paragraph(BodyTarget::Main, banner, InsertLocation::Start)
        .await
        .map_err(RunError::Header)?;

    Ok(HeaderOutcome {
        inserted: false,
        placement: BannerPlacement::BodyFallback,
        notes: vec![format!(
            "Header unavailable ({}); banner added to the top of the body instead.",
            reason
        )],
    })
}

/// Put the banner in the first section's primary header.
///
/// A header that already carries the banner wins: nothing is inserted
/// anywhere and a single note is returned. When headers are not available
/// the banner becomes the first paragraph of the body.
pub async fn ensure_confidential_header(
    doc: &dyn Document,
    capabilities: HostCapabilities,
    banner: &str,
) -> Result<HeaderOutcome> {
    if !capabilities.headers {
        warn!("Header access not supported by host, using body banner");
        return insert_body_banner(doc, banner, "not supported by this host").await;
    }

    match try_header(doc, banner).await? {
        None => {
            info!("Confidentiality banner inserted into header");
            Ok(HeaderOutcome {
                inserted: true,
                placement: BannerPlacement::Header,
                notes: Vec::new(),
            })
        }
        Some(HeaderUnavailable::AlreadyPresent) => Ok(HeaderOutcome {
            inserted: false,
            placement: BannerPlacement::None,
            notes: vec!["Confidential header already present; not inserted again.".to_string()],
        }),
        Some(HeaderUnavailable::Unsupported(reason)) => {
            warn!(%reason, "Header insertion failed, using body banner");
            insert_body_banner(doc, banner, &reason).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_document::MemoryDocument;

    const BANNER: &str = "CONFIDENTIAL";

    #[tokio::test]
    async fn test_tracking_not_requested() {
        let doc = MemoryDocument::new("");
        let outcome = apply_tracking(&doc, HostCapabilities::full(), false)
            .await
            .unwrap();
        assert_eq!(outcome, TrackingOutcome::default());
        assert!(!doc.is_tracking().await);
    }

    #[tokio::test]
    async fn test_tracking_enabled() {
        let doc = MemoryDocument::new("");
        let outcome = apply_tracking(&doc, HostCapabilities::full(), true)
            .await
            .unwrap();
        assert!(outcome.enabled);
        assert!(outcome.note.is_none());
        assert!(doc.is_tracking().await);
    }

    #[tokio::test]
    async fn test_tracking_capability_absent() {
        let doc = MemoryDocument::new("");
        let outcome = apply_tracking(&doc, HostCapabilities::none(), true)
            .await
            .unwrap();
        assert!(!outcome.enabled);
        assert!(outcome.note.is_some());
        assert!(!doc.is_tracking().await);
    }

    #[tokio::test]
    async fn test_tracking_rejected_by_host_is_soft() {
        let doc = MemoryDocument::new("").with_capabilities(HostCapabilities::none());
        let outcome = apply_tracking(&doc, HostCapabilities::full(), true)
            .await
            .unwrap();
        assert!(!outcome.enabled);
        assert!(outcome.note.unwrap().contains("could not be enabled"));
    }

    #[tokio::test]
    async fn test_banner_inserted_into_header() {
        let doc = MemoryDocument::new("body");
        let outcome = ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();

        assert!(outcome.inserted);
        assert_eq!(outcome.placement, BannerPlacement::Header);
        assert!(outcome.notes.is_empty());
        assert_eq!(
            doc.text(BodyTarget::PrimaryHeader(0)).await.unwrap(),
            BANNER
        );
        assert_eq!(doc.text(BodyTarget::Main).await.unwrap(), "body");
    }

    #[tokio::test]
    async fn test_existing_header_banner_not_duplicated() {
        let doc = MemoryDocument::new("body").with_headers(vec![
            "Acme Corp".to_string(),
            "Acme Corp\nconfidential".to_string(),
        ]);

        let outcome = ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();

        assert!(!outcome.inserted);
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(doc.text(BodyTarget::PrimaryHeader(0)).await.unwrap(), "Acme Corp");
        assert_eq!(doc.text(BodyTarget::Main).await.unwrap(), "body");
    }

    #[tokio::test]
    async fn test_second_call_is_idempotent() {
        let doc = MemoryDocument::new("body");
        ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();
        let again = ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();

        assert!(!again.inserted);
        assert_eq!(again.notes.len(), 1);
        assert_eq!(doc.text(BodyTarget::PrimaryHeader(0)).await.unwrap(), BANNER);
    }

    #[tokio::test]
    async fn test_body_fallback_without_header_capability() {
        let doc = MemoryDocument::new("Patient notes").with_capabilities(HostCapabilities {
            headers: false,
            ..HostCapabilities::full()
        });
        let capabilities = doc.capabilities();

        let outcome = ensure_confidential_header(&doc, capabilities, BANNER)
            .await
            .unwrap();
        assert!(!outcome.inserted);
        assert_eq!(outcome.placement, BannerPlacement::BodyFallback);
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(
            doc.text(BodyTarget::Main).await.unwrap(),
            "CONFIDENTIAL\nPatient notes"
        );

        let again = ensure_confidential_header(&doc, capabilities, BANNER)
            .await
            .unwrap();
        assert_eq!(again.placement, BannerPlacement::None);
        assert_eq!(
            doc.text(BodyTarget::Main).await.unwrap(),
            "CONFIDENTIAL\nPatient notes"
        );
    }

    #[tokio::test]
    async fn test_body_fallback_when_host_rejects_header() {
        let doc = MemoryDocument::new("body").with_capabilities(HostCapabilities {
            headers: false,
            ..HostCapabilities::full()
        });

        let outcome = ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();
        assert_eq!(outcome.placement, BannerPlacement::BodyFallback);
        assert!(outcome.notes[0].contains("section headers"));
    }

    #[tokio::test]
    async fn test_body_fallback_without_sections() {
        let doc = MemoryDocument::new("body").with_headers(Vec::new());
        let outcome = ensure_confidential_header(&doc, HostCapabilities::full(), BANNER)
            .await
            .unwrap();
        assert_eq!(outcome.placement, BannerPlacement::BodyFallback);
        assert!(outcome.notes[0].contains("no sections"));
    }
}
