//! Test doubles shared by the core unit tests: in-memory repositories, a
//! scripted completion provider and a recording notification sink.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use lingochat_types::chat::{ChatMessage, ChatSession, MessageDraft, Sender};
use lingochat_types::error::{NotificationError, RepositoryError};
use lingochat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use lingochat_types::notification::NotificationEvent;
use lingochat_types::speaker::{Speaker, SpeakerColor};
use lingochat_types::vocabulary::{DictionarySummary, VocabularyWord};
use uuid::Uuid;

use crate::chat::generator::GeneratorSettings;
use crate::llm::provider::LlmProvider;
use crate::llm::retry::RetryPolicy;
use crate::notify::sink::NotificationSink;
use crate::repository::session::SessionRepository;
use crate::repository::speaker::SpeakerRepository;
use crate::repository::vocabulary::VocabularyRepository;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn speaker(
    id: &str,
    name: &str,
    language: &str,
    flag: &str,
    color: SpeakerColor,
    personality: &[&str],
    interests: &[&str],
) -> Speaker {
    Speaker {
        id: id.to_string(),
        name: name.to_string(),
        language: language.to_string(),
        flag_emoji: flag.to_string(),
        avatar_seed: name.to_string(),
        personality: personality.iter().map(|s| s.to_string()).collect(),
        interests: interests.iter().map(|s| s.to_string()).collect(),
        color,
        created_at: Utc::now(),
    }
}

pub fn aurora() -> Speaker {
    speaker(
        "aurora-001",
        "Aurora",
        "Spanish",
        "🇪🇸",
        SpeakerColor::Pink,
        &["Friendly", "Patient", "Encouraging"],
        &["Music", "Travel", "Culture"],
    )
}

pub fn catalog() -> Vec<Speaker> {
    vec![
        aurora(),
        speaker(
            "hans-002",
            "Hans",
            "German",
            "🇩🇪",
            SpeakerColor::Blue,
            &["Serious", "Precise", "Professional"],
            &["Engineering", "Technology", "History"],
        ),
        speaker(
            "yuki-007",
            "Yuki",
            "Japanese",
            "🇯🇵",
            SpeakerColor::Sky,
            &["Polite", "Thoughtful", "Reserved"],
            &["Anime", "Gardens", "Tradition"],
        ),
    ]
}

pub fn message(id: u32, sender: Sender, text: &str) -> ChatMessage {
    ChatMessage {
        id,
        sender,
        text: text.to_string(),
        timestamp: Utc::now(),
    }
}

/// Generator settings with millisecond backoff.
pub fn fast_settings() -> GeneratorSettings {
    GeneratorSettings {
        retry: RetryPolicy::new(3, Duration::from_millis(1)),
        deadline: Duration::from_secs(5),
        ..GeneratorSettings::default()
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySpeakerRepository {
    speakers: Mutex<HashMap<String, Speaker>>,
    batch_lookups: AtomicUsize,
}

impl InMemorySpeakerRepository {
    pub fn with(speakers: Vec<Speaker>) -> Self {
        Self {
            speakers: Mutex::new(speakers.into_iter().map(|s| (s.id.clone(), s)).collect()),
            batch_lookups: AtomicUsize::new(0),
        }
    }

    pub fn batch_lookups(&self) -> usize {
        self.batch_lookups.load(Ordering::SeqCst)
    }
}

impl SpeakerRepository for InMemorySpeakerRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Speaker>, RepositoryError> {
        Ok(self.speakers.lock().unwrap().get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Speaker>, RepositoryError> {
        self.batch_lookups.fetch_add(1, Ordering::SeqCst);
        let speakers = self.speakers.lock().unwrap();
        Ok(ids.iter().filter_map(|id| speakers.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepositoryError> {
        let mut all: Vec<Speaker> = self.speakers.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn upsert(&self, speaker: &Speaker) -> Result<(), RepositoryError> {
        self.speakers
            .lock()
            .unwrap()
            .insert(speaker.id.clone(), speaker.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, ChatSession>>,
    appends: AtomicUsize,
    fail_after: Option<usize>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends succeed `appends` times, then fail with a query error.
    pub fn failing_after(appends: usize) -> Self {
        Self {
            fail_after: Some(appends),
            ..Self::default()
        }
    }

    pub fn get(&self, id: &str) -> Option<ChatSession> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    pub fn insert(&self, session: ChatSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }
}

impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
        Ok(self.get(session_id))
    }

    async fn create(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .entry(session.id.clone())
            .or_insert_with(|| session.clone())
            .clone())
    }

    async fn append_message(
        &self,
        session_id: &str,
        draft: &MessageDraft,
    ) -> Result<ChatMessage, RepositoryError> {
        let attempt = self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| attempt >= limit) {
            return Err(RepositoryError::Query("database is locked".to_string()));
        }
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .ok_or(RepositoryError::NotFound)?;
        let message = ChatMessage {
            id: session.next_message_id(),
            sender: draft.sender,
            text: draft.text.clone(),
            timestamp: draft.timestamp,
        };
        session.messages.push(message.clone());
        if draft.touch_activity {
            session.last_activity_at = draft.timestamp;
        }
        Ok(message)
    }

    async fn list_recent_by_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let mut owned: Vec<ChatSession> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        owned.truncate(limit as usize);
        Ok(owned)
    }
}

/// Dictionaries as `(user_id, summary)`; `word_count` is computed on read.
#[derive(Default)]
pub struct InMemoryVocabularyRepository {
    dictionaries: Mutex<Vec<(String, DictionarySummary)>>,
    words: Mutex<Vec<VocabularyWord>>,
}

impl VocabularyRepository for InMemoryVocabularyRepository {
    async fn add_word(&self, word: &VocabularyWord, flag_url: &str) -> Result<(), RepositoryError> {
        let mut dictionaries = self.dictionaries.lock().unwrap();
        let exists = dictionaries
            .iter()
            .any(|(user, d)| *user == word.user_id && d.language == word.source_language);
        if !exists {
            dictionaries.push((
                word.user_id.clone(),
                DictionarySummary {
                    id: Uuid::now_v7(),
                    language: word.source_language.clone(),
                    word_count: 0,
                    flag_url: flag_url.to_string(),
                },
            ));
        }
        self.words.lock().unwrap().push(word.clone());
        Ok(())
    }

    async fn list_dictionaries(&self, user_id: &str) -> Result<Vec<DictionarySummary>, RepositoryError> {
        let dictionaries = self.dictionaries.lock().unwrap();
        let words = self.words.lock().unwrap();
        Ok(dictionaries
            .iter()
            .filter(|(user, _)| user == user_id)
            .map(|(_, d)| DictionarySummary {
                word_count: words
                    .iter()
                    .filter(|w| w.user_id == user_id && w.source_language == d.language)
                    .count() as u32,
                ..d.clone()
            })
            .collect())
    }

    async fn list_words(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Vec<VocabularyWord>, RepositoryError> {
        Ok(self
            .words
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == user_id && w.source_language == language)
            .cloned()
            .collect())
    }

    async fn delete_word(&self, user_id: &str, word_id: Uuid) -> Result<bool, RepositoryError> {
        let mut words = self.words.lock().unwrap();
        let before = words.len();
        words.retain(|w| !(w.id == word_id && w.user_id == user_id));
        Ok(words.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Completion provider
// ---------------------------------------------------------------------------

/// Replays canned results in order and records every request it receives.
#[derive(Clone)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                content,
                model: request.model.clone(),
                finish_reason: Some("STOP".to_string()),
                usage: Usage::default(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::Provider {
                message: "no scripted response left".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Notification sink
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
    closed: Arc<AtomicBool>,
    fail: bool,
    delay: Duration,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, event: &NotificationEvent) -> Result<(), NotificationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(NotificationError::Transport("connection refused".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), NotificationError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
