//! Application state wiring all services together.
//!
//! Services are generic over repository/embedder/hasher traits; AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;

use anyhow::Context;
use secrecy::SecretString;

use memoir_core::analytics::calls::CallAnalyzer;
use memoir_core::analytics::correlation::IdentityCorrelator;
use memoir_core::analytics::promises::PromiseAnalyzer;
use memoir_core::extract::transcript::TranscriptExtractor;
use memoir_core::identity::projector::IdentityProjector;
use memoir_core::memory::service::MemoryService;
use memoir_core::pattern::aggregator::PatternAggregator;
use memoir_infra::crypto::hash::Sha256TextHasher;
use memoir_infra::openai::{OpenAiEmbedder, OpenAiTranscriptClassifier};
use memoir_infra::sqlite::call::SqliteCallRepository;
use memoir_infra::sqlite::identity::SqliteIdentityRepository;
use memoir_infra::sqlite::memory::SqliteMemoryRepository;
use memoir_infra::sqlite::pool::DatabasePool;
use memoir_infra::sqlite::profile::SqliteProfileRepository;
use memoir_infra::sqlite::promise::SqlitePromiseRepository;
use memoir_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteMemoryService =
    MemoryService<SqliteMemoryRepository, OpenAiEmbedder, Sha256TextHasher>;

pub type ConcreteAggregator =
    PatternAggregator<SqliteUserRepository, SqliteMemoryRepository, SqliteProfileRepository>;

/// Application state holding all services used by the CLI commands.
pub struct AppState {
    pub memory_service: ConcreteMemoryService,
    pub extractor: TranscriptExtractor<OpenAiTranscriptClassifier>,
    pub projector: IdentityProjector<SqliteIdentityRepository>,
    pub aggregator: ConcreteAggregator,
    pub call_analyzer: CallAnalyzer<SqliteCallRepository>,
    pub promise_analyzer: PromiseAnalyzer<SqlitePromiseRepository>,
    pub correlator: IdentityCorrelator<SqliteIdentityRepository>,
    pub call_repo: SqliteCallRepository,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    ///
    /// Requires `OPENAI_API_KEY` in the environment for the embedding and
    /// classification clients.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database (URL resolves from the same env vars as data_dir)
        let db_url = format!("{}?mode=rwc", memoir_infra::sqlite::pool::default_database_url());
        let db_pool = DatabasePool::new(&db_url).await?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map(SecretString::from)
            .context("OPENAI_API_KEY is not set")?;

        let embedder = OpenAiEmbedder::new(api_key.clone())?;
        let classifier = OpenAiTranscriptClassifier::new(api_key)?;

        let memory_service = MemoryService::new(
            SqliteMemoryRepository::new(db_pool.clone()),
            embedder,
            Sha256TextHasher::new(),
        );

        let aggregator = PatternAggregator::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteMemoryRepository::new(db_pool.clone()),
            SqliteProfileRepository::new(db_pool.clone()),
        );

        Ok(Self {
            memory_service,
            extractor: TranscriptExtractor::new(classifier),
            projector: IdentityProjector::new(SqliteIdentityRepository::new(db_pool.clone())),
            aggregator,
            call_analyzer: CallAnalyzer::new(SqliteCallRepository::new(db_pool.clone())),
            promise_analyzer: PromiseAnalyzer::new(SqlitePromiseRepository::new(db_pool.clone())),
            correlator: IdentityCorrelator::new(SqliteIdentityRepository::new(db_pool.clone())),
            call_repo: SqliteCallRepository::new(db_pool),
        })
    }
}

/// Resolve the data directory from `MEMOIR_DATA_DIR`, falling back to
/// `~/.memoir`.
fn resolve_data_dir() -> PathBuf {
    match std::env::var("MEMOIR_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".memoir")
        }
    }
}
