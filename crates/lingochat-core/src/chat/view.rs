//! Display projections of sessions and speakers.

use chrono::{DateTime, Utc};

use lingochat_types::chat::{ChatSession, RecentChat, SpeakerProfile};
use lingochat_types::speaker::Speaker;

const FLAG_URL_BASE: &str = "https://hatscripts.github.io/circle-flags/flags";

const UNKNOWN_SPEAKER_NAME: &str = "Unknown";
const NO_MESSAGES: &str = "No messages";
const DEFAULT_COLOR: &str = "teal";
const DEFAULT_AVATAR_SEED: &str = "default";
const DEFAULT_FLAG_EMOJI: &str = "🌍";

/// Country code of the flag shown for a language. `un` when unknown.
pub fn country_code(language: &str) -> &'static str {
    match language {
        "Spanish" => "es",
        "German" => "de",
        "French" => "fr",
        "Portuguese" => "pt",
        "Mandarin" => "cn",
        "Italian" => "it",
        "Japanese" => "jp",
        "Korean" => "kr",
        _ => "un",
    }
}

pub fn flag_url(language: &str) -> String {
    format!("{FLAG_URL_BASE}/{}.svg", country_code(language))
}

/// Coarse "time ago" label: minutes under an hour, hours under a day,
/// days otherwise. Future timestamps count as zero minutes.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

pub fn speaker_profile(speaker: &Speaker) -> SpeakerProfile {
    SpeakerProfile {
        name: speaker.name.clone(),
        description: format!("{} speaker", speaker.language),
        avatar_seed: speaker.avatar_seed.clone(),
        flag_url: flag_url(&speaker.language),
        personality: speaker.personality.clone(),
        interests: speaker.interests.clone(),
    }
}

/// One recent-chats row. A missing speaker falls back to placeholder
/// display values instead of dropping the row.
pub fn recent_chat(session: &ChatSession, speaker: Option<&Speaker>, now: DateTime<Utc>) -> RecentChat {
    RecentChat {
        speaker_id: session.speaker_id.clone(),
        chat_id: session.id.clone(),
        name: speaker.map_or_else(|| UNKNOWN_SPEAKER_NAME.to_string(), |s| s.name.clone()),
        last_message: session
            .last_message()
            .map_or_else(|| NO_MESSAGES.to_string(), |m| m.text.clone()),
        timestamp: relative_time(session.last_activity_at, now),
        unread: false,
        color: speaker.map_or(DEFAULT_COLOR, |s| s.color.as_str()).to_string(),
        avatar_seed: speaker
            .map_or_else(|| DEFAULT_AVATAR_SEED.to_string(), |s| s.avatar_seed.clone()),
        flag_emoji: speaker.map_or_else(|| DEFAULT_FLAG_EMOJI.to_string(), |s| s.flag_emoji.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{aurora, message};
    use chrono::Duration;
    use lingochat_types::chat::Sender;

    #[test]
    fn test_flag_url_table() {
        assert_eq!(
            flag_url("Spanish"),
            "https://hatscripts.github.io/circle-flags/flags/es.svg"
        );
        assert_eq!(country_code("Mandarin"), "cn");
        assert_eq!(country_code("Korean"), "kr");
        assert_eq!(country_code("Esperanto"), "un");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "0m ago");
        assert_eq!(relative_time(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(relative_time(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(relative_time(now - Duration::hours(23), now), "23h ago");
        assert_eq!(relative_time(now - Duration::hours(24), now), "1d ago");
        assert_eq!(relative_time(now - Duration::days(9), now), "9d ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "0m ago");
    }

    #[test]
    fn test_speaker_profile() {
        let profile = speaker_profile(&aurora());
        assert_eq!(profile.name, "Aurora");
        assert_eq!(profile.description, "Spanish speaker");
        assert!(profile.flag_url.ends_with("/es.svg"));
        assert_eq!(profile.personality.len(), 3);
    }

    #[test]
    fn test_recent_chat_with_speaker() {
        let now = Utc::now();
        let mut session = ChatSession::new(
            "chat_aurora-001".into(),
            Some("user-1".into()),
            "aurora-001".into(),
        );
        session.messages.push(message(1, Sender::User, "Hola"));
        session.messages.push(message(2, Sender::Speaker, "¡Hola!"));
        session.last_activity_at = now - Duration::minutes(5);

        let row = recent_chat(&session, Some(&aurora()), now);
        assert_eq!(row.chat_id, "chat_aurora-001");
        assert_eq!(row.name, "Aurora");
        assert_eq!(row.last_message, "¡Hola!");
        assert_eq!(row.timestamp, "5m ago");
        assert_eq!(row.color, "pink");
        assert!(!row.unread);
    }

    #[test]
    fn test_recent_chat_fallbacks() {
        let session = ChatSession::new("chat_ghost".into(), Some("user-1".into()), "ghost".into());
        let row = recent_chat(&session, None, Utc::now());
        assert_eq!(row.name, "Unknown");
        assert_eq!(row.last_message, "No messages");
        assert_eq!(row.color, "teal");
        assert_eq!(row.avatar_seed, "default");
        assert_eq!(row.flag_emoji, "🌍");
    }
}
