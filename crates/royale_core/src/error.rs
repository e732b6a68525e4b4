//! Error types for the decision engine.

use thiserror::Error;

use crate::site::SiteId;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error type for data entering the engine.
///
/// Everything here describes a snapshot the engine cannot interpret.
/// Lookup misses during decision making are not errors; they surface as
/// `Option` results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Owner code outside {-1, 0, 1}.
    #[error("Invalid owner code: {0}")]
    InvalidOwner(i32),

    /// Structure code outside {-1, 0, 1, 2}.
    #[error("Invalid structure type code: {0}")]
    InvalidStructureType(i32),

    /// Unit type code outside {-1, 0, 1, 2}.
    #[error("Invalid unit type code: {0}")]
    InvalidUnitType(i32),

    /// Site ID that was never announced in the startup snapshot.
    #[error("Unknown site ID: {0}")]
    UnknownSite(SiteId),

    /// Negative site ID where a real site was required.
    #[error("Invalid site ID: {0}")]
    InvalidSiteId(i32),
}
