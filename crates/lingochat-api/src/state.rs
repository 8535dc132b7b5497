//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the HTTP adapter. The services are generic over their repositories;
//! AppState pins them to the SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lingochat_core::chat::generator::{GeneratorSettings, ResponseGenerator};
use lingochat_core::chat::service::ConversationService;
use lingochat_core::llm::box_provider::BoxLlmProvider;
use lingochat_core::llm::provider::LlmProvider;
use lingochat_core::notify::emitter::NotificationEmitter;
use lingochat_core::notify::sink::BoxNotificationSink;
use lingochat_core::vocabulary::VocabularyService;
use lingochat_infra::config::{Credentials, default_data_dir, load_service_config};
use lingochat_infra::llm::gemini::GeminiProvider;
use lingochat_infra::notify::ServiceBusSink;
use lingochat_infra::sqlite::pool::{DatabasePool, database_url_for};
use lingochat_infra::sqlite::session::SqliteSessionRepository;
use lingochat_infra::sqlite::speaker::SqliteSpeakerRepository;
use lingochat_infra::sqlite::vocabulary::SqliteVocabularyRepository;
use lingochat_types::config::ServiceConfig;
use lingochat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

pub type ConcreteConversationService =
    ConversationService<SqliteSessionRepository, SqliteSpeakerRepository>;
pub type ConcreteVocabularyService = VocabularyService<SqliteVocabularyRepository>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<ConcreteConversationService>,
    pub vocabulary: Arc<ConcreteVocabularyService>,
    pub config: Arc<ServiceConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Load configuration, open the database and wire the services with the
    /// completion provider and a shared notification emitter.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = default_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_service_config(&data_dir).await;
        let credentials = Credentials::from_env();

        let db_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| database_url_for(&data_dir));
        let db_pool = DatabasePool::new(&db_url).await?;

        let provider = build_provider(&config, &credentials)?;
        let generator = ResponseGenerator::new(
            provider,
            GeneratorSettings::from_config(&config.llm, &config.retry),
        );

        let sink = build_sink(&config, &credentials);
        let notifications = NotificationEmitter::from_config(sink, &config.notifications);

        let vocabulary = VocabularyService::new(
            SqliteVocabularyRepository::new(db_pool.clone()),
            notifications.clone(),
        );
        let conversations = ConversationService::new(
            SqliteSessionRepository::new(db_pool.clone()),
            SqliteSpeakerRepository::new(db_pool.clone()),
            generator,
            notifications,
        );

        Ok(Self {
            conversations: Arc::new(conversations),
            vocabulary: Arc::new(vocabulary),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }

    /// Drain pending notifications, close the sink and the database.
    ///
    /// Both services share one emitter, so draining it once covers both.
    pub async fn shutdown(&self) {
        self.conversations.notifications().shutdown().await;
        self.db_pool.close().await;
    }
}

fn build_provider(
    config: &ServiceConfig,
    credentials: &Credentials,
) -> anyhow::Result<BoxLlmProvider> {
    let Some(api_key) = credentials.gemini_api_key.clone() else {
        tracing::warn!("GEMINI_API_KEY not set, replies will fail and translations degrade");
        return Ok(BoxLlmProvider::new(UnconfiguredProvider));
    };

    let provider = GeminiProvider::new(api_key, Duration::from_secs(config.llm.timeout_secs))?
        .with_base_url(config.llm.base_url.clone());
    Ok(BoxLlmProvider::new(provider))
}

fn build_sink(config: &ServiceConfig, credentials: &Credentials) -> Option<BoxNotificationSink> {
    let connection = credentials.service_bus_connection_string.as_ref()?;
    let timeout = Duration::from_millis(config.notifications.publish_timeout_ms);

    match ServiceBusSink::new(connection, &config.notifications.queue, timeout) {
        Ok(sink) => {
            tracing::info!(queue = %sink.queue(), "Service Bus notifications enabled");
            Some(BoxNotificationSink::new(sink))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid Service Bus connection string, notifications disabled");
            None
        }
    }
}

/// Stand-in provider used when no API key is configured.
struct UnconfiguredProvider;

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::AuthenticationFailed)
    }
}
