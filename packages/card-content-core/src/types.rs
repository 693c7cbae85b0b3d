use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Role assigned to a new profile card when the form leaves it untouched.
pub const DEFAULT_ROLE: &str = "DevAssist";
pub const DEFAULT_STYLE: &str = "default";

/// Divisions offered by the add-card form unless the config overrides them.
pub const DEFAULT_DIVISIONS: &[&str] = &[
    "Global Technology",
    "Investment Engine",
    "Enterprise Architecture",
    "Cloud Engineering",
    "Product Engineering",
    "Data Engineering",
    "Security Engineering",
];

/// Optional key that may also arrive as an explicit `null`.
/// `None`: absent. `Some(None)`: `null`. `Some(Some(v))`: a value.
/// Absent keys stay absent and nulls stay null when re-encoded.
pub type Nullable<T> = Option<Option<T>>;

fn keep_null<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The three card collections of a card document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    ProfileTypes,
    HomeCards,
    Guidelines,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::ProfileTypes,
        SectionKind::HomeCards,
        SectionKind::Guidelines,
    ];

    /// JSON key of the collection inside the document.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::ProfileTypes => "profileTypes",
            SectionKind::HomeCards => "homeCards",
            SectionKind::Guidelines => "guidelines",
        }
    }

    /// Profile sections hold `ProfileCard`s, the other kinds hold `CardItem`s.
    pub fn holds_profile_cards(self) -> bool {
        matches!(self, SectionKind::ProfileTypes)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown section kind: {0}")]
pub struct ParseSectionKindError(pub String);

impl FromStr for SectionKind {
    type Err = ParseSectionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "profileTypes" | "profile-types" | "profile" => Ok(SectionKind::ProfileTypes),
            "homeCards" | "home-cards" | "home" => Ok(SectionKind::HomeCards),
            "guidelines" | "guideline" => Ok(SectionKind::Guidelines),
            other => Err(ParseSectionKindError(other.to_string())),
        }
    }
}

/// Wire envelope: `{ "cardContent": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub card_content: CardDocument,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full catalog. Unknown keys survive a round trip through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    #[serde(default)]
    pub profile_types: Vec<ProfileTypeSection>,
    #[serde(default)]
    pub home_cards: Vec<NamedCardSection>,
    #[serde(default)]
    pub guidelines: Vec<GuidelineSection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTypeSection {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub cards: Vec<ProfileCard>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub style: String,
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub division: Nullable<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ProfileCard {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            source: String::new(),
            role: DEFAULT_ROLE.to_string(),
            style: DEFAULT_STYLE.to_string(),
            division: Some(Some(Vec::new())),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedCardSection {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub cards: Vec<CardItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidelineSection {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub cards: Vec<CardItem>,
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub support_email: Nullable<String>,
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub header: Nullable<String>,
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub learn: Nullable<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A home or guideline card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardItem {
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub header: Nullable<String>,
    pub description: String,
    /// Internal stable key (8 hex chars). Never serialized and ignored by
    /// equality, so documents compare exactly as they do on the wire.
    #[serde(skip)]
    pub kid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileCard {
    /// Selected divisions; empty when the key is absent or `null`.
    pub fn divisions(&self) -> &[String] {
        self.division.as_ref().and_then(|d| d.as_deref()).unwrap_or(&[])
    }
}

impl CardItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(Some(header.into()));
        self
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_ref().and_then(|h| h.as_deref())
    }
}

impl PartialEq for CardItem {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.description == other.description
            && self.extra == other.extra
    }
}

impl CardDocument {
    /// Section identifiers of one collection, in document order.
    pub fn section_ids(&self, kind: SectionKind) -> Vec<&str> {
        match kind {
            SectionKind::ProfileTypes => self
                .profile_types
                .iter()
                .map(|s| s.section_type.as_str())
                .collect(),
            SectionKind::HomeCards => self
                .home_cards
                .iter()
                .map(|s| s.section_type.as_str())
                .collect(),
            SectionKind::Guidelines => self
                .guidelines
                .iter()
                .map(|s| s.section_type.as_str())
                .collect(),
        }
    }

    pub fn has_section(&self, kind: SectionKind, section_id: &str) -> bool {
        self.section_ids(kind).contains(&section_id)
    }

    pub fn card_count(&self, kind: SectionKind, section_id: &str) -> Option<usize> {
        match kind {
            SectionKind::ProfileTypes => self.profile_section(section_id).map(|s| s.cards.len()),
            _ => self.item_cards(kind, section_id).map(|cards| cards.len()),
        }
    }

    pub fn profile_section(&self, section_id: &str) -> Option<&ProfileTypeSection> {
        self.profile_types
            .iter()
            .find(|s| s.section_type == section_id)
    }

    pub fn profile_section_mut(&mut self, section_id: &str) -> Option<&mut ProfileTypeSection> {
        self.profile_types
            .iter_mut()
            .find(|s| s.section_type == section_id)
    }

    /// Card list of a home or guideline section. `None` for profile kinds.
    pub fn item_cards(&self, kind: SectionKind, section_id: &str) -> Option<&Vec<CardItem>> {
        match kind {
            SectionKind::ProfileTypes => None,
            SectionKind::HomeCards => self
                .home_cards
                .iter()
                .find(|s| s.section_type == section_id)
                .map(|s| &s.cards),
            SectionKind::Guidelines => self
                .guidelines
                .iter()
                .find(|s| s.section_type == section_id)
                .map(|s| &s.cards),
        }
    }

    pub fn item_cards_mut(
        &mut self,
        kind: SectionKind,
        section_id: &str,
    ) -> Option<&mut Vec<CardItem>> {
        match kind {
            SectionKind::ProfileTypes => None,
            SectionKind::HomeCards => self
                .home_cards
                .iter_mut()
                .find(|s| s.section_type == section_id)
                .map(|s| &mut s.cards),
            SectionKind::Guidelines => self
                .guidelines
                .iter_mut()
                .find(|s| s.section_type == section_id)
                .map(|s| &mut s.cards),
        }
    }

    /// Every home and guideline card, across all sections.
    pub fn all_items_mut(&mut self) -> impl Iterator<Item = &mut CardItem> {
        self.home_cards
            .iter_mut()
            .flat_map(|s| s.cards.iter_mut())
            .chain(self.guidelines.iter_mut().flat_map(|s| s.cards.iter_mut()))
    }

    /// Check that section identifiers are unique within each collection.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for kind in SectionKind::ALL {
            let ids = self.section_ids(kind);
            for (i, id) in ids.iter().enumerate() {
                if ids[..i].contains(id) {
                    return Err(ValidationError::DuplicateSection {
                        kind,
                        id: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
