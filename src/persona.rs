//! Assistant characters
//!
//! A character only selects a system instruction and a TTS accent. The table
//! below is the single place both are defined.

use std::fmt;
use std::str::FromStr;

/// Persona selected by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Character {
    #[default]
    Deva,
    Devi,
}

/// Static per-character data
struct Profile {
    id: &'static str,
    name: &'static str,
    instruction: &'static str,
    /// Google TLD selecting the spoken accent
    accent: &'static str,
}

static PROFILES: [Profile; 2] = [
    Profile {
        id: "deva",
        name: "Deva",
        instruction: include_str!("../prompts/deva.txt"),
        accent: "co.in",
    },
    Profile {
        id: "devi",
        name: "Devi",
        instruction: include_str!("../prompts/devi.txt"),
        accent: "com.au",
    },
];

impl Character {
    /// Every known character
    pub const ALL: [Self; 2] = [Self::Deva, Self::Devi];

    /// Parse an optional identifier, falling back to [`Character::Deva`]
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return Self::default();
        };

        Self::ALL
            .into_iter()
            .find(|c| c.profile().id.eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }

    fn profile(self) -> &'static Profile {
        match self {
            Self::Deva => &PROFILES[0],
            Self::Devi => &PROFILES[1],
        }
    }

    /// Lowercase identifier used on the wire
    #[must_use]
    pub fn id(self) -> &'static str {
        self.profile().id
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.profile().name
    }

    /// System instruction sent to the language model
    #[must_use]
    pub fn system_instruction(self) -> &'static str {
        self.profile().instruction
    }

    /// Accent parameter passed to the TTS provider
    #[must_use]
    pub fn tts_accent(self) -> &'static str {
        self.profile().accent
    }
}

impl FromStr for Character {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_characters_parse_case_insensitively() {
        assert_eq!(Character::parse(Some("devi")), Character::Devi);
        assert_eq!(Character::parse(Some("DEVI")), Character::Devi);
        assert_eq!(Character::parse(Some(" Devi ")), Character::Devi);
        assert_eq!(Character::parse(Some("Deva")), Character::Deva);
    }

    #[test]
    fn unknown_or_missing_falls_back_to_deva() {
        for value in [None, Some(""), Some("orin"), Some("devii"), Some("d")] {
            assert_eq!(Character::parse(value), Character::Deva, "{value:?}");
        }
        assert_eq!("anything".parse::<Character>(), Ok(Character::Deva));
    }

    #[test]
    fn each_character_has_its_own_prompt_and_accent() {
        assert_eq!(Character::Deva.tts_accent(), "co.in");
        assert_eq!(Character::Devi.tts_accent(), "com.au");
        assert!(Character::Deva.system_instruction().contains("Your name is Deva"));
        assert!(Character::Devi.system_instruction().contains("Your name is Devi"));
        assert!(Character::Devi.system_instruction().contains("Sir"));
    }

    #[test]
    fn display_matches_wire_id() {
        assert_eq!(Character::Devi.to_string(), "devi");
        assert_eq!(Character::Deva.display_name(), "Deva");
    }
}
