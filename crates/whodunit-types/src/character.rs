//! The suspect cast.
//!
//! A fixed, small set of characters the player can interrogate. The cast is
//! built once at startup and never changes for the lifetime of a session.

use serde::{Deserialize, Serialize};

/// A suspect the player can interrogate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable key used in request bodies and history maps (e.g. "emilia").
    pub id: String,
    /// Display name used in prompts and speaker labels.
    pub name: String,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The immutable roster of suspects, plus the identity of the culprit.
#[derive(Debug, Clone)]
pub struct Cast {
    characters: Vec<Character>,
    culprit_id: String,
}

impl Cast {
    /// Build a cast from an explicit roster.
    ///
    /// `culprit_id` must be the id of one of the given characters.
    pub fn new(characters: Vec<Character>, culprit_id: impl Into<String>) -> Self {
        let culprit_id = culprit_id.into();
        debug_assert!(characters.iter().any(|c| c.id == culprit_id));
        Self {
            characters,
            culprit_id,
        }
    }

    /// The standard three-suspect cast of the Sandra mansion case.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Character::new("emilia", "Emilia Sandra"),
                Character::new("oliver", "Oliver Howard"),
                Character::new("lucy", "Lucy Gray"),
            ],
            "emilia",
        )
    }

    /// Look up a character by its stable id.
    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Whether the given id names the culprit.
    pub fn is_culprit(&self, id: &str) -> bool {
        id == self.culprit_id
    }

    /// All characters, in roster order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }
}

impl Default for Cast {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cast_has_three_suspects() {
        let cast = Cast::standard();
        assert_eq!(cast.characters().len(), 3);
    }

    #[test]
    fn test_lookup_by_id() {
        let cast = Cast::standard();
        assert_eq!(cast.get("emilia").unwrap().name, "Emilia Sandra");
        assert_eq!(cast.get("oliver").unwrap().name, "Oliver Howard");
        assert_eq!(cast.get("lucy").unwrap().name, "Lucy Gray");
        assert!(cast.get("richard").is_none());
    }

    #[test]
    fn test_culprit_identity() {
        let cast = Cast::standard();
        assert!(cast.is_culprit("emilia"));
        assert!(!cast.is_culprit("oliver"));
        assert!(!cast.is_culprit("lucy"));
    }
}
