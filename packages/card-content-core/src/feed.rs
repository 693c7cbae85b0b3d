/// Card selection for the chat home screen.
///
/// Picks a shuffled subset of profile cards for the currently selected role.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{CardDocument, ProfileCard};

/// Profile type the chat home screen draws its cards from.
pub const FEED_PROFILE_TYPE: &str = "CrewMate";

/// Role value meaning "no explicit role selected".
pub const DEFAULT_FEED_ROLE: &str = "default";

/// Card roles only shown to users holding that role.
const GATED_ROLES: &[&str] = &["writer", "chathub"];

#[derive(Debug, Clone)]
pub struct FeedRequest<'a> {
    pub profile_type: &'a str,
    pub selected_role: &'a str,
    /// Roles held by the current user, as delivered by the identity provider.
    pub user_roles: &'a [String],
    pub visible: usize,
}

/// Lowercase user roles, with `creator` treated as `writer`.
fn normalize_user_roles(roles: &[String]) -> Vec<String> {
    roles
        .iter()
        .map(|role| {
            let lower = role.to_lowercase();
            if lower == "creator" {
                "writer".to_string()
            } else {
                lower
            }
        })
        .collect()
}

/// Cards eligible for the request, in document order.
pub fn eligible_cards<'a>(doc: &'a CardDocument, request: &FeedRequest<'_>) -> Vec<&'a ProfileCard> {
    let cards = doc
        .profile_types
        .iter()
        .filter(|section| section.section_type == request.profile_type)
        .flat_map(|section| section.cards.iter());

    if request.selected_role == DEFAULT_FEED_ROLE {
        let held = normalize_user_roles(request.user_roles);
        cards
            .filter(|card| {
                if GATED_ROLES.contains(&card.role.as_str()) {
                    held.iter().any(|r| *r == card.role)
                } else {
                    true
                }
            })
            .collect()
    } else {
        cards
            .filter(|card| card.role == request.selected_role)
            .collect()
    }
}

/// Shuffle the eligible cards and keep the first `visible`.
pub fn pick_cards<R: Rng + ?Sized>(
    doc: &CardDocument,
    request: &FeedRequest<'_>,
    rng: &mut R,
) -> Vec<ProfileCard> {
    let mut cards: Vec<ProfileCard> = eligible_cards(doc, request).into_iter().cloned().collect();
    cards.shuffle(rng);
    cards.truncate(request.visible);
    log::debug!(
        target: "card_content.feed",
        "Picked {} cards for role {}",
        cards.len(),
        request.selected_role
    );
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProfileTypeSection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str, role: &str) -> ProfileCard {
        ProfileCard {
            id: id.to_string(),
            description: format!("{} card", id),
            source: "feed".to_string(),
            role: role.to_string(),
            ..Default::default()
        }
    }

    fn make_doc() -> CardDocument {
        CardDocument {
            profile_types: vec![
                ProfileTypeSection {
                    section_type: "CrewMate".to_string(),
                    cards: vec![
                        card("dev1", "DevAssist"),
                        card("dev2", "DevAssist"),
                        card("wr1", "writer"),
                        card("hub1", "chathub"),
                        card("ana1", "Analyst"),
                    ],
                    ..Default::default()
                },
                ProfileTypeSection {
                    section_type: "Captain".to_string(),
                    cards: vec![card("cap1", "DevAssist")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn ids(cards: &[&ProfileCard]) -> Vec<String> {
        cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_explicit_role_filters_exactly() {
        let doc = make_doc();
        let request = FeedRequest {
            profile_type: FEED_PROFILE_TYPE,
            selected_role: "DevAssist",
            user_roles: &[],
            visible: 10,
        };
        assert_eq!(ids(&eligible_cards(&doc, &request)), vec!["dev1", "dev2"]);
    }

    #[test]
    fn test_default_role_hides_gated_cards() {
        let doc = make_doc();
        let request = FeedRequest {
            profile_type: FEED_PROFILE_TYPE,
            selected_role: DEFAULT_FEED_ROLE,
            user_roles: &[],
            visible: 10,
        };
        assert_eq!(ids(&eligible_cards(&doc, &request)), vec!["dev1", "dev2", "ana1"]);
    }

    #[test]
    fn test_creator_unlocks_writer_cards() {
        let doc = make_doc();
        let roles = vec!["Creator".to_string(), "ChatHub".to_string()];
        let request = FeedRequest {
            profile_type: FEED_PROFILE_TYPE,
            selected_role: DEFAULT_FEED_ROLE,
            user_roles: &roles,
            visible: 10,
        };
        assert_eq!(
            ids(&eligible_cards(&doc, &request)),
            vec!["dev1", "dev2", "wr1", "hub1", "ana1"]
        );
    }

    #[test]
    fn test_pick_limits_and_is_seeded() {
        let doc = make_doc();
        let request = FeedRequest {
            profile_type: FEED_PROFILE_TYPE,
            selected_role: DEFAULT_FEED_ROLE,
            user_roles: &[],
            visible: 2,
        };
        let first = pick_cards(&doc, &request, &mut StdRng::seed_from_u64(7));
        let second = pick_cards(&doc, &request, &mut StdRng::seed_from_u64(7));
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert!(first.iter().all(|c| c.role != "writer" && c.role != "chathub"));
    }

    #[test]
    fn test_unknown_profile_type_is_empty() {
        let doc = make_doc();
        let request = FeedRequest {
            profile_type: "Admiral",
            selected_role: DEFAULT_FEED_ROLE,
            user_roles: &[],
            visible: 4,
        };
        assert!(pick_cards(&doc, &request, &mut StdRng::seed_from_u64(1)).is_empty());
    }
}
