pub mod form;
pub mod handle;
pub mod notice;
mod sync;

pub use form::CardForm;
pub use handle::EditorHandle;
pub use notice::{Notice, NoticeLevel};
pub use sync::ApplyTicket;

use std::collections::VecDeque;

use crate::config::EditorConfig;
use crate::error::{EditorError, ValidationError};
use crate::mutation::{self, Card};
use crate::snapshot::SnapshotHolder;
use crate::store::StoreError;
use crate::tracking::{diff, CardChange, ChangeLog, ChangeRecord, ChangeType};
use crate::types::{CardContent, SectionKind};

/// Screen-level state: `Loading -> {Error, Ready}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorPhase {
    Loading,
    Error(String),
    Ready,
}

/// Phase plus the clean/dirty sub-flag of `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Loading,
    Error,
    Clean,
    Dirty,
}

/// Issued by `begin_load`; results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Card content editor: one configurable screen for every section kind.
///
/// Owns the snapshot holder and the audit log exclusively. Network calls are
/// split into begin/finish halves so callers never hold the editor across an
/// await; see `EditorHandle`.
#[derive(Debug)]
pub struct Editor {
    phase: EditorPhase,
    snapshot: SnapshotHolder,
    changes: ChangeLog,
    kind: SectionKind,
    selected: Option<String>,
    form: CardForm,
    notices: VecDeque<Notice>,
    saving: bool,
    /// Bumped on every load and on close; stale network results compare unequal.
    generation: u64,
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            phase: EditorPhase::Loading,
            snapshot: SnapshotHolder::new(),
            changes: ChangeLog::new(),
            kind: SectionKind::ProfileTypes,
            selected: None,
            form: CardForm::new(config),
            notices: VecDeque::new(),
            saving: false,
            generation: 0,
        }
    }

    // ── Loading ─────────────────────────────────────────────────────────

    /// Enter `Loading` and invalidate any request still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = EditorPhase::Loading;
        self.saving = false;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Install the fetched document, or move to `Error` on failure.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<CardContent, StoreError>,
    ) -> Result<(), EditorError> {
        if ticket.generation != self.generation {
            log::debug!(
                target: "card_content.editor",
                "Dropping stale load result (generation {} != {})",
                ticket.generation,
                self.generation
            );
            return Ok(());
        }
        match result {
            Ok(content) => {
                self.snapshot.load(content);
                self.changes.clear();
                self.phase = EditorPhase::Ready;
                self.select_first_section();
                log::info!(
                    target: "card_content.editor",
                    "Loaded card content ({} profile types, {} home sections, {} guideline sections)",
                    self.section_ids_of(SectionKind::ProfileTypes).len(),
                    self.section_ids_of(SectionKind::HomeCards).len(),
                    self.section_ids_of(SectionKind::Guidelines).len(),
                );
                Ok(())
            }
            Err(e) => {
                log::error!(target: "card_content.editor", "Error fetching content: {}", e);
                self.snapshot.clear();
                self.selected = None;
                self.phase = EditorPhase::Error(e.to_string());
                self.notify(Notice::new(NoticeLevel::Error, "Error fetching content"));
                Err(EditorError::Fetch(e))
            }
        }
    }

    /// Invalidate in-flight requests; their results will be discarded.
    pub fn close(&mut self) {
        self.generation += 1;
        self.saving = false;
    }

    // ── State ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> &EditorPhase {
        &self.phase
    }

    pub fn status(&self) -> EditorStatus {
        match self.phase {
            EditorPhase::Loading => EditorStatus::Loading,
            EditorPhase::Error(_) => EditorStatus::Error,
            EditorPhase::Ready if self.is_dirty() => EditorStatus::Dirty,
            EditorPhase::Ready => EditorStatus::Clean,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == EditorPhase::Ready
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn working(&self) -> Option<&CardContent> {
        self.snapshot.working()
    }

    pub fn original(&self) -> Option<&CardContent> {
        self.snapshot.original()
    }

    pub fn pending_changes(&self) -> &[ChangeRecord] {
        self.changes.records()
    }

    /// Card-level summary of what an apply would write.
    pub fn diff(&self) -> Vec<CardChange> {
        match (self.snapshot.original(), self.snapshot.working()) {
            (Some(original), Some(working)) => diff::diff_documents(original, working),
            _ => Vec::new(),
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Switch tab; selects the first section of the new kind.
    pub fn set_kind(&mut self, kind: SectionKind) {
        self.kind = kind;
        self.select_first_section();
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.section_ids_of(self.kind)
    }

    fn section_ids_of(&self, kind: SectionKind) -> Vec<&str> {
        self.snapshot
            .working()
            .map(|w| w.card_content.section_ids(kind))
            .unwrap_or_default()
    }

    fn select_first_section(&mut self) {
        self.selected = self.section_ids().first().map(|id| id.to_string());
    }

    pub fn selected_section(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select_section(&mut self, section_id: &str) -> Result<(), EditorError> {
        let working = self.snapshot.working().ok_or(EditorError::NotReady)?;
        if !working.card_content.has_section(self.kind, section_id) {
            return Err(EditorError::SectionNotFound {
                kind: self.kind,
                id: section_id.to_string(),
            });
        }
        self.selected = Some(section_id.to_string());
        Ok(())
    }

    // ── Form ────────────────────────────────────────────────────────────

    pub fn form(&self) -> &CardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CardForm {
        &mut self.form
    }

    // ── Mutations ───────────────────────────────────────────────────────

    fn selection(&self) -> Result<String, EditorError> {
        if !self.is_ready() {
            return Err(EditorError::NotReady);
        }
        self.selected.clone().ok_or(EditorError::NoSelection)
    }

    /// Add the form's card to the selected section; clears the form on success.
    pub fn submit_form(&mut self) -> Result<(), EditorError> {
        let card = self.form.to_card(self.kind);
        self.add_card(card)?;
        self.form.reset();
        Ok(())
    }

    /// Append `card` to the selected section of the working copy.
    pub fn add_card(&mut self, card: Card) -> Result<(), EditorError> {
        let section = self.selection()?;
        let working = self.snapshot.working_mut().ok_or(EditorError::NotReady)?;

        if let Err(e) = mutation::check_add(&working.card_content, self.kind, &section, &card) {
            if let EditorError::Validation(v) = &e {
                log::warn!(target: "card_content.editor", "Rejected card: {}", v);
                self.notify(
                    Notice::new(NoticeLevel::Warning, rejection_title(v))
                        .with_description(v.to_string()),
                );
            }
            return Err(e);
        }

        self.changes
            .record(ChangeType::Add, card.change_details(&section));
        mutation::add_card(&mut working.card_content, self.kind, &section, card)?;
        self.notify(Notice::new(NoticeLevel::Success, "Card added"));
        Ok(())
    }

    /// Remove every card in the selected section sharing `target`'s identity.
    pub fn delete_card(&mut self, target: &Card) -> Result<usize, EditorError> {
        let section = self.selection()?;
        let working = self.snapshot.working_mut().ok_or(EditorError::NotReady)?;
        if !target.fits(self.kind) {
            return Err(ValidationError::CardKindMismatch { kind: self.kind }.into());
        }

        let matching = mutation::count_matching(
            &working.card_content,
            self.kind,
            &section,
            target.identity(),
        )?;
        if matching == 0 {
            return Ok(0);
        }

        self.changes
            .record(ChangeType::Delete, target.change_details(&section));
        let removed = mutation::delete_card(&mut working.card_content, self.kind, &section, target)?;
        self.notify(Notice::new(NoticeLevel::Info, "Card deleted"));
        Ok(removed)
    }

    /// Delete by identity value (profile `id` or item `description`).
    pub fn delete_by_identity(&mut self, identity: &str) -> Result<usize, EditorError> {
        let target = self.find_card(identity)?;
        match target {
            Some(card) => self.delete_card(&card),
            None => Ok(0),
        }
    }

    /// First card in the selected section with the given identity.
    pub fn find_card(&self, identity: &str) -> Result<Option<Card>, EditorError> {
        let section = self.selection()?;
        let working = self.snapshot.working().ok_or(EditorError::NotReady)?;
        let doc = &working.card_content;
        let not_found = || EditorError::SectionNotFound {
            kind: self.kind,
            id: section.clone(),
        };
        if self.kind.holds_profile_cards() {
            let cards = &doc.profile_section(&section).ok_or_else(not_found)?.cards;
            Ok(cards
                .iter()
                .find(|c| c.id == identity)
                .cloned()
                .map(Card::Profile))
        } else {
            let cards = doc.item_cards(self.kind, &section).ok_or_else(not_found)?;
            Ok(cards
                .iter()
                .find(|c| c.description == identity)
                .cloned()
                .map(Card::Item))
        }
    }

    /// Remove the single item carrying `kid` from the selected section.
    pub fn delete_item_by_kid(&mut self, kid: &str) -> Result<bool, EditorError> {
        let section = self.selection()?;
        let working = self.snapshot.working_mut().ok_or(EditorError::NotReady)?;
        let exists = working
            .card_content
            .item_cards(self.kind, &section)
            .ok_or_else(|| EditorError::SectionNotFound {
                kind: self.kind,
                id: section.clone(),
            })?
            .iter()
            .find(|c| c.kid.as_deref() == Some(kid))
            .cloned();
        let Some(item) = exists else {
            return Ok(false);
        };

        self.changes.record(
            ChangeType::Delete,
            Card::Item(item).change_details(&section),
        );
        mutation::delete_item_by_kid(&mut working.card_content, self.kind, &section, kid)?;
        self.notify(Notice::new(NoticeLevel::Info, "Card deleted"));
        Ok(true)
    }
}

/// Toast title for a rejected card.
fn rejection_title(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::MissingField(_) => "Required fields missing",
        ValidationError::EmptyDivision | ValidationError::DuplicateDivision(_) => "Invalid division",
        ValidationError::DuplicateSection { .. } => "Duplicate section",
        ValidationError::CardKindMismatch { .. } => "Wrong card type for this section",
    }
}
