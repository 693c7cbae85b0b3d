/// Structural comparison between the snapshot and the working copy.
///
/// `is_dirty` is the authoritative flag: any difference, including a pure
/// reorder, makes the document dirty. `diff_documents` explains the difference
/// card by card for a pending-changes view.
use serde::Serialize;

use crate::types::{CardContent, CardDocument, CardItem, ProfileCard, SectionKind};

/// True iff the documents differ. Sequences compare positionally.
pub fn is_dirty(original: &CardContent, working: &CardContent) -> bool {
    original != working
}

/// A single card-level difference between two document versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CardChange {
    Added {
        kind: SectionKind,
        section: String,
        card_id: String,
        description: String,
    },
    Removed {
        kind: SectionKind,
        section: String,
        card_id: String,
        description: String,
    },
    /// Same cards, different order.
    Reordered { kind: SectionKind, section: String },
}

/// Card-independent view used for matching.
struct CardView<'a, T> {
    card: &'a T,
    card_id: String,
    description: &'a str,
}

fn profile_views(cards: &[ProfileCard]) -> Vec<CardView<'_, ProfileCard>> {
    cards
        .iter()
        .map(|card| CardView {
            card,
            card_id: card.id.clone(),
            description: &card.description,
        })
        .collect()
}

fn item_views(cards: &[CardItem]) -> Vec<CardView<'_, CardItem>> {
    cards
        .iter()
        .map(|card| CardView {
            card,
            card_id: card.header().unwrap_or_default().to_string(),
            description: &card.description,
        })
        .collect()
}

fn diff_section<T: PartialEq>(
    kind: SectionKind,
    section: &str,
    old: &[CardView<'_, T>],
    new: &[CardView<'_, T>],
    changes: &mut Vec<CardChange>,
) {
    let mut matched = vec![false; new.len()];
    let mut any_removed = false;

    for old_view in old {
        let hit = new
            .iter()
            .enumerate()
            .find(|(i, new_view)| !matched[*i] && new_view.card == old_view.card)
            .map(|(i, _)| i);
        match hit {
            Some(i) => matched[i] = true,
            None => {
                any_removed = true;
                changes.push(CardChange::Removed {
                    kind,
                    section: section.to_string(),
                    card_id: old_view.card_id.clone(),
                    description: old_view.description.to_string(),
                });
            }
        }
    }

    let mut any_added = false;
    for (i, new_view) in new.iter().enumerate() {
        if !matched[i] {
            any_added = true;
            changes.push(CardChange::Added {
                kind,
                section: section.to_string(),
                card_id: new_view.card_id.clone(),
                description: new_view.description.to_string(),
            });
        }
    }

    if !any_added && !any_removed {
        let reordered = old
            .iter()
            .zip(new.iter())
            .any(|(a, b)| a.card != b.card);
        if reordered {
            changes.push(CardChange::Reordered {
                kind,
                section: section.to_string(),
            });
        }
    }
}

/// Section identifiers of both versions: old order first, then new-only ones.
fn section_union<'a>(old: Vec<&'a str>, new: Vec<&'a str>) -> Vec<&'a str> {
    let mut ids = old;
    for id in new {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn diff_card_documents(old: &CardDocument, new: &CardDocument) -> Vec<CardChange> {
    let mut changes = Vec::new();
    for kind in SectionKind::ALL {
        let ids = section_union(old.section_ids(kind), new.section_ids(kind));
        for id in ids {
            if kind.holds_profile_cards() {
                let old_cards = old.profile_section(id).map(|s| s.cards.as_slice()).unwrap_or(&[]);
                let new_cards = new.profile_section(id).map(|s| s.cards.as_slice()).unwrap_or(&[]);
                diff_section(
                    kind,
                    id,
                    &profile_views(old_cards),
                    &profile_views(new_cards),
                    &mut changes,
                );
            } else {
                let old_cards = old.item_cards(kind, id).map(Vec::as_slice).unwrap_or(&[]);
                let new_cards = new.item_cards(kind, id).map(Vec::as_slice).unwrap_or(&[]);
                diff_section(
                    kind,
                    id,
                    &item_views(old_cards),
                    &item_views(new_cards),
                    &mut changes,
                );
            }
        }
    }
    changes
}

/// Compute card-level changes between two document versions.
/// An edited card shows up as a removal of the old card plus an addition.
pub fn diff_documents(old: &CardContent, new: &CardContent) -> Vec<CardChange> {
    diff_card_documents(&old.card_content, &new.card_content)
}
