//! Prompt assembly for speaker replies and word translation.
//!
//! The system instruction carries the persona; the single user turn sent to
//! the provider carries the bounded conversation history followed by the new
//! user line and an open `<Name>:` label for the model to complete.

use std::fmt::Write as _;

use lingochat_types::chat::{ChatMessage, Sender};
use lingochat_types::speaker::Speaker;
use lingochat_types::translation::WordTranslation;

/// Messages of context sent per reply, counting the new user turn.
pub const HISTORY_WINDOW: usize = 10;

/// Prior messages shown alongside a new user turn, oldest first.
///
/// The context is the last `HISTORY_WINDOW` messages of the log ending with
/// the new turn; the turn itself is rendered separately, so at most
/// `HISTORY_WINDOW - 1` prior messages are returned.
pub fn history_for_turn(prior: &[ChatMessage]) -> &[ChatMessage] {
    let start = prior.len().saturating_sub(HISTORY_WINDOW - 1);
    &prior[start..]
}

/// Persona instruction for a speaker.
pub fn build_system_instruction(speaker: &Speaker) -> String {
    let mut prompt = format!(
        "You are {}, a {} language practice partner.\n\nYour personality traits:\n",
        speaker.name, speaker.language
    );
    for trait_name in &speaker.personality {
        let _ = writeln!(prompt, "- {trait_name}");
    }
    prompt.push_str("\nYour interests:\n");
    for interest in &speaker.interests {
        let _ = writeln!(prompt, "- {interest}");
    }
    let _ = write!(
        prompt,
        "\nIMPORTANT RULES:\n\
         1. Always respond in {}\n\
         2. Keep responses concise (2-3 sentences)\n\
         3. Gently correct user mistakes\n\
         4. Ask follow-up questions",
        speaker.language
    );
    prompt
}

/// History transcript plus the new user line, ending with the speaker's
/// label so the model answers in character.
pub fn build_conversation(speaker: &Speaker, history: &[ChatMessage], user_text: &str) -> String {
    let mut body = String::from("Conversation history:\n");
    for message in history {
        let label = match message.sender {
            Sender::User => "User",
            Sender::Speaker => speaker.name.as_str(),
        };
        let _ = writeln!(body, "{label}: {}", message.text);
    }
    let _ = write!(body, "\nUser: {user_text}\n{}:", speaker.name);
    body
}

pub fn build_translation_prompt(word: &str, from_language: &str, to_languages: &[String]) -> String {
    format!(
        "Translate \"{word}\" from {from_language} to {}. Return ONLY JSON array: \
         [{{\"language\":\"English\",\"word\":\"translation\",\"color\":\"blue\"}},...]",
        to_languages.join(", ")
    )
}

/// Parse a translation reply, tolerating a surrounding markdown code fence.
///
/// Returns `None` for anything that is not a non-empty JSON array of
/// translations.
pub fn parse_translations(raw: &str) -> Option<Vec<WordTranslation>> {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<Vec<WordTranslation>>(body) {
        Ok(list) if !list.is_empty() => Some(list),
        _ => None,
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

/// Apology returned when the provider's quota is exhausted, in the
/// speaker's language. Unknown languages get English.
pub fn fallback_phrase(language: &str) -> &'static str {
    match language {
        "Spanish" => "Lo siento, estoy teniendo problemas técnicos. Por favor intenta de nuevo.",
        "German" => {
            "Es tut mir leid, ich habe gerade technische Probleme. Bitte versuche es noch einmal."
        }
        "French" => "Désolé, je rencontre des problèmes techniques. Merci de réessayer.",
        "Portuguese" => "Desculpe, estou com problemas técnicos. Por favor, tente novamente.",
        "Mandarin" => "抱歉，我遇到了一些技术问题。请再试一次。",
        "Italian" => "Mi dispiace, sto avendo problemi tecnici. Per favore riprova.",
        "Japanese" => "申し訳ありません、技術的な問題が発生しています。もう一度お試しください。",
        "Korean" => "죄송합니다, 기술적인 문제가 있습니다. 다시 시도해 주세요.",
        _ => "Sorry, I'm having technical problems. Please try again.",
    }
}
