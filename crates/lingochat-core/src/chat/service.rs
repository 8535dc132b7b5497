//! Conversation service: the inbound message flow and the read-side
//! projections of sessions.
//!
//! An inbound message is stored before the completion call is made, so a
//! generation failure leaves the user's turn in the log with no reply. The
//! reply and the activity timestamp are written together afterwards, and
//! the `NEW_MESSAGE` notification is handed to the emitter without waiting.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use lingochat_types::chat::{
    ChatSession, MessageDraft, MessageEcho, RecentChat, SendMessageOutcome, SessionView,
    speaker_id_from_session_id,
};
use lingochat_types::error::ChatError;
use lingochat_types::notification::{NewMessagePayload, NotificationEvent};
use lingochat_types::speaker::Speaker;
use lingochat_types::translation::WordTranslation;
use tracing::{debug, info, warn};

use crate::chat::generator::ResponseGenerator;
use crate::chat::locks::SessionLocks;
use crate::chat::prompt::history_for_turn;
use crate::chat::view;
use crate::notify::emitter::NotificationEmitter;
use crate::repository::session::SessionRepository;
use crate::repository::speaker::SpeakerRepository;

/// Maximum number of entries in the recent-chats list.
pub const RECENT_SESSIONS_LIMIT: u32 = 10;

/// Orchestrates sessions, speakers, reply generation and notifications.
///
/// Generic over the repositories so lingochat-core never depends on
/// lingochat-infra.
pub struct ConversationService<S: SessionRepository, P: SpeakerRepository> {
    sessions: S,
    speakers: P,
    generator: ResponseGenerator,
    notifications: NotificationEmitter,
    locks: SessionLocks,
}

impl<S: SessionRepository, P: SpeakerRepository> ConversationService<S, P> {
    pub fn new(
        sessions: S,
        speakers: P,
        generator: ResponseGenerator,
        notifications: NotificationEmitter,
    ) -> Self {
        Self {
            sessions,
            speakers,
            generator,
            notifications,
            locks: SessionLocks::new(),
        }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn speakers(&self) -> &P {
        &self.speakers
    }

    pub fn notifications(&self) -> &NotificationEmitter {
        &self.notifications
    }

    /// Store the user's message, generate the speaker's reply, store it and
    /// announce it.
    #[tracing::instrument(name = "chat.inbound", skip_all, fields(session_id = %session_id))]
    pub async fn handle_inbound_message(
        &self,
        session_id: &str,
        user_id: Option<&str>,
        text: &str,
    ) -> Result<SendMessageOutcome, ChatError> {
        let received_at_utc = Utc::now();
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ChatError::Validation("Session id is required".to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Validation("Message text is required".to_string()));
        }
        let user_id = user_id.map(str::trim).filter(|u| !u.is_empty());

        let _guard = self.locks.acquire(session_id).await;

        let existing = self.sessions.find_by_id(session_id).await?;
        let speaker_id = existing.as_ref().map_or_else(
            || speaker_id_from_session_id(session_id).to_string(),
            |s| s.speaker_id.clone(),
        );
        let speaker = self.require_speaker(&speaker_id).await?;

        let session = match existing {
            Some(session) => session,
            None => {
                let fresh = ChatSession::new(
                    session_id.to_string(),
                    user_id.map(str::to_string),
                    speaker_id.clone(),
                );
                let stored = self.sessions.create(&fresh).await?;
                info!(session_id, speaker_id = %speaker_id, "Chat session created");
                stored
            }
        };

        let user_message = self
            .sessions
            .append_message(session_id, &MessageDraft::user(text))
            .await?;
        debug!(session_id, message_id = user_message.id, "User message stored");

        let history = history_for_turn(&session.messages);
        let reply_text = match self.generator.generate_reply(&speaker, text, history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id, error = %e, "Reply generation failed, user message kept");
                return Err(e);
            }
        };

        let reply = self
            .sessions
            .append_message(session_id, &MessageDraft::speaker(reply_text))
            .await?;
        info!(
            session_id,
            speaker_id = %speaker.id,
            message_id = reply.id,
            "Speaker reply stored"
        );

        let notify_user = user_id
            .map(str::to_string)
            .or_else(|| session.user_id.clone());
        self.notifications
            .emit(NotificationEvent::new_message(NewMessagePayload::new(
                notify_user,
                speaker.id.as_str(),
                speaker.name.as_str(),
                &reply.text,
            )));

        Ok(SendMessageOutcome {
            echo: MessageEcho {
                received_at_utc,
                session_id: session_id.to_string(),
                your_message: text.to_string(),
            },
            assistant_reply: reply,
        })
    }

    /// A session with its speaker's display profile.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionView, ChatError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("chat session '{session_id}'")))?;
        let speaker = self.require_speaker(&session.speaker_id).await?;

        Ok(SessionView {
            speaker: view::speaker_profile(&speaker),
            messages: session.messages,
        })
    }

    /// The user's most recently active sessions, newest first.
    pub async fn list_recent_sessions(&self, user_id: &str) -> Result<Vec<RecentChat>, ChatError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ChatError::Validation("userId is required".to_string()));
        }

        let mut sessions = self
            .sessions
            .list_recent_by_user(user_id, RECENT_SESSIONS_LIMIT)
            .await?;
        sessions.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        sessions.truncate(RECENT_SESSIONS_LIMIT as usize);

        let mut seen = HashSet::new();
        let speaker_ids: Vec<String> = sessions
            .iter()
            .filter(|s| seen.insert(s.speaker_id.as_str()))
            .map(|s| s.speaker_id.clone())
            .collect();
        let speakers: HashMap<String, Speaker> = self
            .speakers
            .find_by_ids(&speaker_ids)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let now = Utc::now();
        Ok(sessions
            .iter()
            .map(|session| view::recent_chat(session, speakers.get(&session.speaker_id), now))
            .collect())
    }

    /// Translate a word into each target language. Degrades to
    /// placeholders instead of failing.
    pub async fn translate_word(
        &self,
        word: &str,
        from_language: &str,
        to_languages: &[String],
    ) -> Result<Vec<WordTranslation>, ChatError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(ChatError::Validation("Word is required".to_string()));
        }
        Ok(self
            .generator
            .translate_word(word, from_language, to_languages)
            .await)
    }

    async fn require_speaker(&self, speaker_id: &str) -> Result<Speaker, ChatError> {
        self.speakers
            .find_by_id(speaker_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("speaker '{speaker_id}'")))
    }
}
