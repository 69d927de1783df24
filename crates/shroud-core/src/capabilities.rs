use serde::{Deserialize, Serialize};

/// Options supplied by the caller for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub insert_header: bool,
    pub enable_tracking: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            insert_header: true,
            enable_tracking: true,
        }
    }
}

/// Host features that only some editor versions support.
///
/// Detected by the caller and injected into a run, so every capability
/// branch in the engine is decided from this value rather than by probing
/// the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    /// Switching the document into tracked-changes mode
    pub change_tracking: bool,
    /// Enumerating and unwrapping hyperlinks (desktop API)
    pub hyperlinks: bool,
    /// Reading and writing section primary headers
    pub headers: bool,
}

impl HostCapabilities {
    /// A host that supports every optional feature
    pub fn full() -> Self {
        Self {
            change_tracking: true,
            hyperlinks: true,
            headers: true,
        }
    }

    /// A host that supports none of the optional features
    pub fn none() -> Self {
        Self {
            change_tracking: false,
            hyperlinks: false,
            headers: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::full()
    }
}
