//! Speaker (persona) types.
//!
//! A speaker is a predefined conversational identity with a fixed target
//! language and personality profile. Speakers are seeded once and are
//! read-only to the conversation core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A predefined AI conversation partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    /// Stable catalog identifier (e.g. "aurora-001").
    pub id: String,
    pub name: String,
    /// Target language the speaker always answers in (e.g. "Spanish").
    pub language: String,
    pub flag_emoji: String,
    pub avatar_seed: String,
    pub personality: Vec<String>,
    pub interests: Vec<String>,
    pub color: SpeakerColor,
    pub created_at: DateTime<Utc>,
}

/// Display color tag used by clients to theme a speaker's chat and the
/// cards of saved words.
///
/// Maps to the CHECK constraint in the SQLite schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerColor {
    Teal,
    Pink,
    Yellow,
    Orange,
    Blue,
    Green,
    Red,
    Purple,
    Sky,
    Indigo,
    Emerald,
    Rose,
}

impl SpeakerColor {
    pub const ALL: [SpeakerColor; 12] = [
        SpeakerColor::Teal,
        SpeakerColor::Pink,
        SpeakerColor::Yellow,
        SpeakerColor::Orange,
        SpeakerColor::Blue,
        SpeakerColor::Green,
        SpeakerColor::Red,
        SpeakerColor::Purple,
        SpeakerColor::Sky,
        SpeakerColor::Indigo,
        SpeakerColor::Emerald,
        SpeakerColor::Rose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerColor::Teal => "teal",
            SpeakerColor::Pink => "pink",
            SpeakerColor::Yellow => "yellow",
            SpeakerColor::Orange => "orange",
            SpeakerColor::Blue => "blue",
            SpeakerColor::Green => "green",
            SpeakerColor::Red => "red",
            SpeakerColor::Purple => "purple",
            SpeakerColor::Sky => "sky",
            SpeakerColor::Indigo => "indigo",
            SpeakerColor::Emerald => "emerald",
            SpeakerColor::Rose => "rose",
        }
    }
}

impl Default for SpeakerColor {
    fn default() -> Self {
        SpeakerColor::Teal
    }
}

impl fmt::Display for SpeakerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeakerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        SpeakerColor::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("invalid speaker color: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_color_roundtrip() {
        for color in SpeakerColor::ALL {
            let parsed: SpeakerColor = color.to_string().parse().unwrap();
            assert_eq!(parsed, color);
        }
    }

    #[test]
    fn test_speaker_color_rejects_unknown() {
        let err = "magenta".parse::<SpeakerColor>().unwrap_err();
        assert!(err.contains("magenta"));
    }

    #[test]
    fn test_speaker_color_default_is_teal() {
        assert_eq!(SpeakerColor::default(), SpeakerColor::Teal);
        assert_eq!(serde_json::to_string(&SpeakerColor::Sky).unwrap(), "\"sky\"");
    }
}
