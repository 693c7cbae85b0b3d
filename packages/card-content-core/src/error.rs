use crate::store::StoreError;
use crate::types::SectionKind;

/// Rejected user input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Division name is empty")]
    EmptyDivision,

    #[error("Division already selected: {0}")]
    DuplicateDivision(String),

    #[error("Duplicate {kind} section: {id}")]
    DuplicateSection { kind: SectionKind, id: String },

    #[error("A {kind} section cannot hold this kind of card")]
    CardKindMismatch { kind: SectionKind },
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Initial load failed, including malformed responses.
    #[error("Failed to fetch card content: {0}")]
    Fetch(#[source] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Apply failed; the working copy is kept.
    #[error("Failed to save changes: {0}")]
    Sync(#[source] StoreError),

    #[error("Card content is not loaded")]
    NotReady,

    #[error("No {kind} section named {id:?}")]
    SectionNotFound { kind: SectionKind, id: String },

    #[error("No section selected")]
    NoSelection,
}
