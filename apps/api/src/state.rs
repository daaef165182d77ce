use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::ai::ranking::CandidateRanker;
use crate::auth::TokenService;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume PDF storage.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    pub tokens: TokenService,
    /// Pluggable candidate ranker. Default: LlmRanker. Swap via ENABLE_LLM_RANKING env.
    pub ranker: Arc<dyn CandidateRanker>,
}
