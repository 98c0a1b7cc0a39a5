//! Asset reference parsing error types.

use thiserror::Error;

/// Reasons a CMS asset `_ref` string could not be turned into a CDN path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum AssetRefError {
    #[error("asset reference is empty")]
    Empty,

    #[error("asset reference has prefix {prefix:?}, expected \"image\"")]
    WrongPrefix { prefix: String },

    #[error("asset reference has only {segments} segment(s)")]
    Truncated { segments: usize },

    #[error("asset reference yields an empty asset id")]
    EmptyId,

    #[error("asset reference dimensions {segment:?} exceed the supported range")]
    DimensionsOutOfRange { segment: String },
}

impl AssetRefError {
    /// Short label of the failing parse branch, used as a log field.
    #[must_use]
    pub const fn case(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::WrongPrefix { .. } => "wrong_prefix",
            Self::Truncated { .. } => "truncated",
            Self::EmptyId => "empty_id",
            Self::DimensionsOutOfRange { .. } => "dimensions_out_of_range",
        }
    }
}
