//! Built-in speaker catalog and seeding.

use chrono::Utc;
use lingochat_core::repository::speaker::SpeakerRepository;
use lingochat_types::error::RepositoryError;
use lingochat_types::speaker::{Speaker, SpeakerColor};
use tracing::info;

struct SeedSpeaker {
    id: &'static str,
    name: &'static str,
    language: &'static str,
    flag_emoji: &'static str,
    avatar_seed: &'static str,
    personality: [&'static str; 3],
    interests: [&'static str; 3],
    color: SpeakerColor,
}

const SEED_SPEAKERS: [SeedSpeaker; 8] = [
    SeedSpeaker {
        id: "aurora-001",
        name: "Aurora",
        language: "Spanish",
        flag_emoji: "🇪🇸",
        avatar_seed: "Aurora",
        personality: ["Friendly", "Patient", "Encouraging"],
        interests: ["Music", "Travel", "Culture"],
        color: SpeakerColor::Pink,
    },
    SeedSpeaker {
        id: "hans-002",
        name: "Hans",
        language: "German",
        flag_emoji: "🇩🇪",
        avatar_seed: "Hans",
        personality: ["Serious", "Precise", "Professional"],
        interests: ["Engineering", "Technology", "History"],
        color: SpeakerColor::Blue,
    },
    SeedSpeaker {
        id: "marie-003",
        name: "Marie",
        language: "French",
        flag_emoji: "🇫🇷",
        avatar_seed: "Marie",
        personality: ["Artistic", "Romantic", "Sophisticated"],
        interests: ["Art", "Fashion", "Cuisine"],
        color: SpeakerColor::Purple,
    },
    SeedSpeaker {
        id: "joao-004",
        name: "João",
        language: "Portuguese",
        flag_emoji: "🇧🇷",
        avatar_seed: "Joao",
        personality: ["Relaxed", "Funny", "Warm"],
        interests: ["Football", "Beach", "Music"],
        color: SpeakerColor::Green,
    },
    SeedSpeaker {
        id: "mei-005",
        name: "Mei",
        language: "Mandarin",
        flag_emoji: "🇨🇳",
        avatar_seed: "Mei",
        personality: ["Curious", "Diligent", "Respectful"],
        interests: ["Literature", "Calligraphy", "Tea"],
        color: SpeakerColor::Red,
    },
    SeedSpeaker {
        id: "giulia-006",
        name: "Giulia",
        language: "Italian",
        flag_emoji: "🇮🇹",
        avatar_seed: "Giulia",
        personality: ["Expressive", "Passionate", "Warm"],
        interests: ["Food", "Opera", "Architecture"],
        color: SpeakerColor::Orange,
    },
    SeedSpeaker {
        id: "yuki-007",
        name: "Yuki",
        language: "Japanese",
        flag_emoji: "🇯🇵",
        avatar_seed: "Yuki",
        personality: ["Polite", "Thoughtful", "Reserved"],
        interests: ["Anime", "Gardens", "Tradition"],
        color: SpeakerColor::Sky,
    },
    SeedSpeaker {
        id: "minji-008",
        name: "Minji",
        language: "Korean",
        flag_emoji: "🇰🇷",
        avatar_seed: "Minji",
        personality: ["Energetic", "Modern", "Trendy"],
        interests: ["K-pop", "Technology", "Fashion"],
        color: SpeakerColor::Teal,
    },
];

/// The eight built-in speakers.
pub fn speaker_catalog() -> Vec<Speaker> {
    let created_at = Utc::now();
    SEED_SPEAKERS
        .iter()
        .map(|s| Speaker {
            id: s.id.to_string(),
            name: s.name.to_string(),
            language: s.language.to_string(),
            flag_emoji: s.flag_emoji.to_string(),
            avatar_seed: s.avatar_seed.to_string(),
            personality: s.personality.iter().map(|p| p.to_string()).collect(),
            interests: s.interests.iter().map(|i| i.to_string()).collect(),
            color: s.color,
            created_at,
        })
        .collect()
}

/// Upsert the built-in catalog. Returns the number of speakers written.
pub async fn seed_speakers<R: SpeakerRepository>(repo: &R) -> Result<usize, RepositoryError> {
    let catalog = speaker_catalog();
    for speaker in &catalog {
        repo.upsert(speaker).await?;
    }
    info!(count = catalog.len(), "Speaker catalog seeded");
    Ok(catalog.len())
}
