/// Draft state of the add-card form.
use crate::config::EditorConfig;
use crate::error::ValidationError;
use crate::mutation::Card;
use crate::types::{CardItem, ProfileCard, SectionKind};

#[derive(Debug, Clone, PartialEq)]
pub struct CardForm {
    pub id: String,
    pub description: String,
    pub source: String,
    pub role: String,
    pub style: String,
    pub division: Vec<String>,
    /// Optional header for home and guideline cards.
    pub header: String,
    default_role: String,
    default_style: String,
}

impl CardForm {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_defaults(&config.default_role, &config.default_style)
    }

    pub fn with_defaults(default_role: &str, default_style: &str) -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            source: String::new(),
            role: default_role.to_string(),
            style: default_style.to_string(),
            division: Vec::new(),
            header: String::new(),
            default_role: default_role.to_string(),
            default_style: default_style.to_string(),
        }
    }

    /// Clear every field back to its default.
    pub fn reset(&mut self) {
        *self = Self::with_defaults(&self.default_role, &self.default_style);
    }

    /// Select the division if absent, deselect it otherwise.
    pub fn toggle_division(&mut self, division: &str) {
        if let Some(pos) = self.division.iter().position(|d| d == division) {
            self.division.remove(pos);
        } else {
            self.division.push(division.to_string());
        }
    }

    /// Add a free-text division.
    pub fn add_division(&mut self, division: &str) -> Result<(), ValidationError> {
        let division = division.trim();
        if division.is_empty() {
            return Err(ValidationError::EmptyDivision);
        }
        if self.division.iter().any(|d| d == division) {
            return Err(ValidationError::DuplicateDivision(division.to_string()));
        }
        self.division.push(division.to_string());
        Ok(())
    }

    pub fn remove_division_at(&mut self, index: usize) -> Option<String> {
        (index < self.division.len()).then(|| self.division.remove(index))
    }

    /// Build the card this form describes for a section of `kind`.
    pub fn to_card(&self, kind: SectionKind) -> Card {
        if kind.holds_profile_cards() {
            Card::Profile(ProfileCard {
                id: self.id.clone(),
                description: self.description.clone(),
                source: self.source.clone(),
                role: self.role.clone(),
                style: self.style.clone(),
                division: Some(Some(self.division.clone())),
                ..Default::default()
            })
        } else {
            let header = self.header.trim();
            Card::Item(CardItem {
                header: (!header.is_empty()).then(|| Some(header.to_string())),
                description: self.description.clone(),
                ..Default::default()
            })
        }
    }
}
