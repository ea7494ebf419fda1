use thiserror::Error;

/// Problems found while reading an atlas descriptor.
///
/// Entry-level variants (`MissingAttribute`, `InvalidNumber`) are collected as
/// warnings and the offending entry is dropped. The remaining variants reject
/// the whole document.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("entry {entry}: missing attribute `{attribute}`")]
    MissingAttribute { entry: usize, attribute: &'static str },

    #[error("entry {entry}: attribute `{attribute}` is not a valid number: {value:?}")]
    InvalidNumber {
        entry: usize,
        attribute: &'static str,
        value: String,
    },

    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },

    #[error("descriptor has no root element")]
    MissingRoot,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DescriptorError {
    /// Whether this error only affects a single entry.
    pub fn is_entry_level(&self) -> bool {
        matches!(
            self,
            DescriptorError::MissingAttribute { .. } | DescriptorError::InvalidNumber { .. }
        )
    }
}

/// Problems loading a persisted sprite manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported sprite manifest version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u8, supported: u8 },
}
