/// Apply/discard: the only paths that move data between snapshot and working copy.
use super::{Editor, Notice, NoticeLevel};
use crate::error::EditorError;
use crate::store::StoreError;
use crate::types::CardContent;

/// A write in flight. Holds the exact document being sent.
#[derive(Debug, Clone)]
pub struct ApplyTicket {
    generation: u64,
    /// Audit records made before this mark are covered by this write.
    covered_mark: u64,
    document: CardContent,
}

impl ApplyTicket {
    pub fn document(&self) -> &CardContent {
        &self.document
    }
}

impl Editor {
    /// Start an apply. Returns `None` when there is nothing to write or a
    /// write is already in flight.
    pub fn begin_apply(&mut self) -> Option<ApplyTicket> {
        if !self.is_ready() || !self.is_dirty() {
            log::debug!(target: "card_content.editor.sync", "Apply skipped: no changes");
            return None;
        }
        if self.saving {
            log::debug!(target: "card_content.editor.sync", "Apply skipped: write in flight");
            return None;
        }
        let document = self.snapshot.working()?.clone();
        self.saving = true;
        Some(ApplyTicket {
            generation: self.generation,
            covered_mark: self.changes.mark(),
            document,
        })
    }

    /// Complete an apply started with `begin_apply`.
    ///
    /// On success the sent document becomes the snapshot. On failure the
    /// working copy stays as it is and remains dirty.
    pub fn finish_apply(
        &mut self,
        ticket: ApplyTicket,
        result: Result<(), StoreError>,
    ) -> Result<(), EditorError> {
        if ticket.generation != self.generation {
            log::debug!(
                target: "card_content.editor.sync",
                "Dropping stale apply result (generation {} != {})",
                ticket.generation,
                self.generation
            );
            return Ok(());
        }
        self.saving = false;
        match result {
            Ok(()) => {
                self.snapshot.commit_with(ticket.document);
                self.changes.drain_before(ticket.covered_mark);
                log::info!(target: "card_content.editor.sync", "Changes saved");
                self.notify(Notice::new(NoticeLevel::Success, "Changes saved successfully"));
                Ok(())
            }
            Err(e) => {
                log::error!(target: "card_content.editor.sync", "Failed to save changes: {}", e);
                self.notify(
                    Notice::new(NoticeLevel::Error, "Failed to save changes")
                        .with_description(e.to_string()),
                );
                Err(EditorError::Sync(e))
            }
        }
    }

    /// Reset the working copy to the snapshot and clear the audit log.
    pub fn discard_changes(&mut self) {
        self.snapshot.reset();
        self.changes.clear();
        log::info!(target: "card_content.editor.sync", "Changes discarded");
        self.notify(Notice::new(NoticeLevel::Info, "Changes discarded"));
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{crew_mate_content, dev007, ready_editor};
    use super::super::EditorStatus;
    use super::*;
    use crate::types::SectionKind;

    fn unavailable() -> StoreError {
        StoreError::Status {
            status: 503,
            body: "down".to_string(),
        }
    }

    #[test]
    fn test_apply_on_clean_is_noop() {
        let mut editor = ready_editor();
        assert!(editor.begin_apply().is_none());
        assert!(!editor.is_saving());
    }

    #[test]
    fn test_reentrant_apply_suppressed() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        let ticket = editor.begin_apply().unwrap();
        assert!(editor.is_saving());
        assert!(editor.begin_apply().is_none());
        editor.finish_apply(ticket, Ok(())).unwrap();
        assert!(!editor.is_saving());
    }

    #[test]
    fn test_apply_success_commits_and_clears_log() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        let ticket = editor.begin_apply().unwrap();
        editor.finish_apply(ticket, Ok(())).unwrap();
        assert_eq!(editor.status(), EditorStatus::Clean);
        assert!(editor.pending_changes().is_empty());
        let original = editor.original().unwrap();
        assert_eq!(original.card_content.card_count(SectionKind::ProfileTypes, "CrewMate"), Some(1));
    }

    #[test]
    fn test_apply_failure_keeps_working_copy() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        editor.drain_notices();
        let ticket = editor.begin_apply().unwrap();
        let err = editor.finish_apply(ticket, Err(unavailable())).unwrap_err();
        assert!(matches!(err, EditorError::Sync(_)));
        assert_eq!(editor.status(), EditorStatus::Dirty);
        assert_eq!(editor.pending_changes().len(), 1);
        let working = editor.working().unwrap();
        assert_eq!(working.card_content.card_count(SectionKind::ProfileTypes, "CrewMate"), Some(1));
        let notices = editor.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        // User retry goes through.
        let ticket = editor.begin_apply().unwrap();
        editor.finish_apply(ticket, Ok(())).unwrap();
        assert_eq!(editor.status(), EditorStatus::Clean);
    }

    #[test]
    fn test_edits_during_flight_stay_pending() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        let ticket = editor.begin_apply().unwrap();
        editor.delete_by_identity("dev007").unwrap();
        editor.finish_apply(ticket, Ok(())).unwrap();
        // Snapshot has the card, working copy does not.
        assert_eq!(editor.status(), EditorStatus::Dirty);
        assert_eq!(editor.pending_changes().len(), 1);
        assert_eq!(editor.pending_changes()[0].change_type, crate::tracking::ChangeType::Delete);
    }

    #[test]
    fn test_discard_during_flight_keeps_later_records() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        let ticket = editor.begin_apply().unwrap();
        editor.discard_changes();
        let mut dev008 = dev007();
        if let crate::mutation::Card::Profile(card) = &mut dev008 {
            card.id = "dev008".to_string();
        }
        editor.add_card(dev008).unwrap();
        editor.finish_apply(ticket, Ok(())).unwrap();

        assert!(editor.is_dirty());
        assert_eq!(editor.pending_changes().len(), 1);
        assert_eq!(editor.pending_changes()[0].details.card_id, "dev008");
    }

    #[test]
    fn test_stale_apply_result_dropped() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        let ticket = editor.begin_apply().unwrap();
        editor.close();
        editor.finish_apply(ticket, Ok(())).unwrap();
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_discard_restores_snapshot() {
        let mut editor = ready_editor();
        editor.add_card(dev007()).unwrap();
        editor.discard_changes();
        assert_eq!(editor.working(), editor.original());
        assert_eq!(editor.working().unwrap(), &crew_mate_content());
        assert!(editor.pending_changes().is_empty());
        assert_eq!(editor.status(), EditorStatus::Clean);
    }

    #[test]
    fn test_discard_when_clean_is_harmless() {
        let mut editor = ready_editor();
        editor.discard_changes();
        assert_eq!(editor.status(), EditorStatus::Clean);
        assert_eq!(editor.drain_notices().last().unwrap().title, "Changes discarded");
    }
}
