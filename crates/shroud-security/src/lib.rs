//! Sensitive-data detection for shroud
//!
//! - [`normalize`]: comparison forms (dash/space unification, digits-only,
//!   alphanumeric-only)
//! - [`classifier`]: one pattern per sensitive category, with false-positive
//!   guards

pub mod classifier;
pub mod normalize;

pub use classifier::{Classifier, ClassifierOptions};
pub use normalize::{Simplifier, alnum_only, digits_only, normalize_token, simplifier_for};
