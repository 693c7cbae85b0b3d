/// Add/delete operations on the working copy, scoped to one section.
///
/// These functions only touch the in-memory document; persisting is the
/// sync controller's job.
use crate::error::{EditorError, ValidationError};
use crate::tracking::card_identity;
use crate::tracking::ChangeDetails;
use crate::types::{CardDocument, CardItem, ProfileCard, SectionKind};

/// A card of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Profile(ProfileCard),
    Item(CardItem),
}

impl Card {
    /// Required-field check for a new card.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Card::Profile(card) => {
                if card.id.is_empty() {
                    return Err(ValidationError::MissingField("id"));
                }
                if card.description.is_empty() {
                    return Err(ValidationError::MissingField("description"));
                }
                if card.source.is_empty() {
                    return Err(ValidationError::MissingField("source"));
                }
                Ok(())
            }
            Card::Item(item) => {
                if item.description.is_empty() {
                    return Err(ValidationError::MissingField("description"));
                }
                Ok(())
            }
        }
    }

    /// Delete identity: `id` for profile cards, `description` for items.
    pub fn identity(&self) -> &str {
        match self {
            Card::Profile(card) => &card.id,
            Card::Item(item) => &item.description,
        }
    }

    pub fn fits(&self, kind: SectionKind) -> bool {
        matches!(self, Card::Profile(_)) == kind.holds_profile_cards()
    }

    /// Audit-log details for this card in `section_id`.
    pub fn change_details(&self, section_id: &str) -> ChangeDetails {
        let (card_id, description) = match self {
            Card::Profile(card) => (card.id.clone(), card.description.clone()),
            Card::Item(item) => (
                item.header().unwrap_or_default().to_string(),
                item.description.clone(),
            ),
        };
        ChangeDetails {
            profile_type: section_id.to_string(),
            card_id,
            description,
        }
    }
}

fn section_not_found(kind: SectionKind, section_id: &str) -> EditorError {
    EditorError::SectionNotFound {
        kind,
        id: section_id.to_string(),
    }
}

/// Everything `add_card` checks, without mutating.
pub fn check_add(
    doc: &CardDocument,
    kind: SectionKind,
    section_id: &str,
    card: &Card,
) -> Result<(), EditorError> {
    if !card.fits(kind) {
        return Err(ValidationError::CardKindMismatch { kind }.into());
    }
    card.validate()?;
    if !doc.has_section(kind, section_id) {
        return Err(section_not_found(kind, section_id));
    }
    Ok(())
}

/// Append `card` to the end of the section. Duplicate ids are not rejected.
pub fn add_card(
    doc: &mut CardDocument,
    kind: SectionKind,
    section_id: &str,
    card: Card,
) -> Result<(), EditorError> {
    check_add(doc, kind, section_id, &card)?;
    match card {
        Card::Profile(card) => {
            let section = doc
                .profile_section_mut(section_id)
                .ok_or_else(|| section_not_found(kind, section_id))?;
            section.cards.push(card);
        }
        Card::Item(mut item) => {
            if item.kid.is_none() {
                item.kid = Some(card_identity::generate_kid());
            }
            let cards = doc
                .item_cards_mut(kind, section_id)
                .ok_or_else(|| section_not_found(kind, section_id))?;
            cards.push(item);
        }
    }
    Ok(())
}

/// How many cards in the section share `identity`.
pub fn count_matching(
    doc: &CardDocument,
    kind: SectionKind,
    section_id: &str,
    identity: &str,
) -> Result<usize, EditorError> {
    if kind.holds_profile_cards() {
        let section = doc
            .profile_section(section_id)
            .ok_or_else(|| section_not_found(kind, section_id))?;
        Ok(section.cards.iter().filter(|c| c.id == identity).count())
    } else {
        let cards = doc
            .item_cards(kind, section_id)
            .ok_or_else(|| section_not_found(kind, section_id))?;
        Ok(cards.iter().filter(|c| c.description == identity).count())
    }
}

/// Remove every card in the section whose identity equals `identity`.
/// Returns the number removed. Other sections are untouched.
pub fn delete_by_identity(
    doc: &mut CardDocument,
    kind: SectionKind,
    section_id: &str,
    identity: &str,
) -> Result<usize, EditorError> {
    if kind.holds_profile_cards() {
        let section = doc
            .profile_section_mut(section_id)
            .ok_or_else(|| section_not_found(kind, section_id))?;
        let before = section.cards.len();
        section.cards.retain(|c| c.id != identity);
        Ok(before - section.cards.len())
    } else {
        let cards = doc
            .item_cards_mut(kind, section_id)
            .ok_or_else(|| section_not_found(kind, section_id))?;
        let before = cards.len();
        cards.retain(|c| c.description != identity);
        Ok(before - cards.len())
    }
}

/// Remove every card sharing `target`'s identity.
pub fn delete_card(
    doc: &mut CardDocument,
    kind: SectionKind,
    section_id: &str,
    target: &Card,
) -> Result<usize, EditorError> {
    if !target.fits(kind) {
        return Err(ValidationError::CardKindMismatch { kind }.into());
    }
    delete_by_identity(doc, kind, section_id, target.identity())
}

/// Remove exactly the item carrying `kid`, leaving same-description items.
pub fn delete_item_by_kid(
    doc: &mut CardDocument,
    kind: SectionKind,
    section_id: &str,
    kid: &str,
) -> Result<Option<CardItem>, EditorError> {
    if kind.holds_profile_cards() {
        return Err(ValidationError::CardKindMismatch { kind }.into());
    }
    let cards = doc
        .item_cards_mut(kind, section_id)
        .ok_or_else(|| section_not_found(kind, section_id))?;
    let pos = cards.iter().position(|c| c.kid.as_deref() == Some(kid));
    Ok(pos.map(|pos| cards.remove(pos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NamedCardSection, ProfileTypeSection};

    fn make_doc() -> CardDocument {
        CardDocument {
            profile_types: vec![
                ProfileTypeSection {
                    section_type: "CrewMate".to_string(),
                    ..Default::default()
                },
                ProfileTypeSection {
                    section_type: "Captain".to_string(),
                    cards: vec![profile("dev007")],
                    ..Default::default()
                },
            ],
            home_cards: vec![NamedCardSection {
                section_type: "welcome".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn profile(id: &str) -> ProfileCard {
        ProfileCard {
            id: id.to_string(),
            description: "x".to_string(),
            source: "y".to_string(),
            ..Default::default()
        }
    }

    fn item(description: &str) -> Card {
        Card::Item(CardItem {
            description: description.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_add_appends_last() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::ProfileTypes, "CrewMate", Card::Profile(profile("a"))).unwrap();
        add_card(&mut doc, SectionKind::ProfileTypes, "CrewMate", Card::Profile(profile("b"))).unwrap();
        let cards = &doc.profile_section("CrewMate").unwrap().cards;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].id, "b");
    }

    #[test]
    fn test_add_rejects_missing_source() {
        let mut doc = make_doc();
        let mut card = profile("dev008");
        card.source.clear();
        let err = add_card(&mut doc, SectionKind::ProfileTypes, "CrewMate", Card::Profile(card))
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Validation(ValidationError::MissingField("source"))
        ));
        assert_eq!(doc, make_doc());
    }

    #[test]
    fn test_add_item_only_requires_description() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("hello")).unwrap();
        let cards = doc.item_cards(SectionKind::HomeCards, "welcome").unwrap();
        assert_eq!(cards.len(), 1);
        assert!(cards[0].kid.is_some());
        assert!(add_card(&mut doc, SectionKind::HomeCards, "welcome", item("")).is_err());
    }

    #[test]
    fn test_add_to_missing_section() {
        let mut doc = make_doc();
        let err = add_card(&mut doc, SectionKind::HomeCards, "tips", item("x")).unwrap_err();
        assert!(matches!(err, EditorError::SectionNotFound { .. }));
    }

    #[test]
    fn test_add_kind_mismatch() {
        let mut doc = make_doc();
        let err = add_card(&mut doc, SectionKind::HomeCards, "welcome", Card::Profile(profile("a")))
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Validation(ValidationError::CardKindMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_profile_ids_allowed() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::ProfileTypes, "Captain", Card::Profile(profile("dev007"))).unwrap();
        assert_eq!(doc.card_count(SectionKind::ProfileTypes, "Captain"), Some(2));
    }

    #[test]
    fn test_delete_scoped_to_section() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::ProfileTypes, "CrewMate", Card::Profile(profile("dev007"))).unwrap();
        let removed = delete_card(
            &mut doc,
            SectionKind::ProfileTypes,
            "CrewMate",
            &Card::Profile(profile("dev007")),
        )
        .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(doc.card_count(SectionKind::ProfileTypes, "CrewMate"), Some(0));
        assert_eq!(doc.card_count(SectionKind::ProfileTypes, "Captain"), Some(1));
    }

    #[test]
    fn test_delete_by_description_removes_duplicates() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("dup")).unwrap();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("keep")).unwrap();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("dup")).unwrap();
        assert_eq!(
            count_matching(&doc, SectionKind::HomeCards, "welcome", "dup").unwrap(),
            2
        );
        let removed = delete_card(&mut doc, SectionKind::HomeCards, "welcome", &item("dup")).unwrap();
        assert_eq!(removed, 2);
        let cards = doc.item_cards(SectionKind::HomeCards, "welcome").unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].description, "keep");
    }

    #[test]
    fn test_delete_item_by_kid_removes_one() {
        let mut doc = make_doc();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("dup")).unwrap();
        add_card(&mut doc, SectionKind::HomeCards, "welcome", item("dup")).unwrap();
        let kid = doc.item_cards(SectionKind::HomeCards, "welcome").unwrap()[1]
            .kid
            .clone()
            .unwrap();
        let removed = delete_item_by_kid(&mut doc, SectionKind::HomeCards, "welcome", &kid).unwrap();
        assert_eq!(removed.and_then(|c| c.kid), Some(kid));
        assert_eq!(doc.card_count(SectionKind::HomeCards, "welcome"), Some(1));
        assert!(delete_item_by_kid(&mut doc, SectionKind::HomeCards, "welcome", "00000000")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_change_details_for_item_uses_header() {
        let card = Card::Item(CardItem::new("Use tabs").with_header("Tip"));
        let details = card.change_details("welcome");
        assert_eq!(details.card_id, "Tip");
        assert_eq!(details.profile_type, "welcome");
    }
}
