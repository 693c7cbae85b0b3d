/// Holds the last-synced document and the working copy being edited.
///
/// Both copies are owned values: mutating one never affects the other.
/// Granularity is the whole document.
use crate::tracking::card_identity;
use crate::tracking::diff;
use crate::types::CardContent;

#[derive(Debug, Default)]
pub struct SnapshotHolder {
    original: Option<CardContent>,
    working: Option<CardContent>,
}

impl SnapshotHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched document as both snapshot and working copy.
    pub fn load(&mut self, mut content: CardContent) {
        card_identity::assign_missing_kids(&mut content.card_content);
        self.original = Some(content.clone());
        self.working = Some(content);
    }

    /// Drop both copies (failed load).
    pub fn clear(&mut self) {
        self.original = None;
        self.working = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.working.is_some()
    }

    pub fn original(&self) -> Option<&CardContent> {
        self.original.as_ref()
    }

    pub fn working(&self) -> Option<&CardContent> {
        self.working.as_ref()
    }

    pub fn working_mut(&mut self) -> Option<&mut CardContent> {
        self.working.as_mut()
    }

    /// Overwrite the working copy with the snapshot.
    pub fn reset(&mut self) {
        if let Some(original) = &self.original {
            self.working = Some(original.clone());
        }
    }

    /// Promote the working copy to snapshot.
    pub fn commit(&mut self) {
        if let Some(working) = &self.working {
            self.original = Some(working.clone());
        }
    }

    /// Promote a specific document, e.g. the one actually written to the
    /// store while the working copy kept changing.
    pub fn commit_with(&mut self, content: CardContent) {
        self.original = Some(content);
    }

    pub fn is_dirty(&self) -> bool {
        match (&self.original, &self.working) {
            (Some(original), Some(working)) => diff::is_dirty(original, working),
            _ => false,
        }
    }
}
