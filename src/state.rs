/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - guard: Basic 認証, pipeline: claim 検証, encoder: 応答の契約
 * - 起動時に Config から一度だけ組み立て、以後は読み取り専用
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessGuard, build_access_guard};
use crate::services::response::ResponseEncoder;
use crate::services::validation::{StaticClaims, ValidationPipeline};

#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<AccessGuard>,
    pub pipeline: Arc<ValidationPipeline>,
    pub encoder: Arc<ResponseEncoder>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        guard: Arc<AccessGuard>,
        pipeline: Arc<ValidationPipeline>,
        encoder: Arc<ResponseEncoder>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            guard,
            pipeline,
            encoder,
            max_body_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let encoder = ResponseEncoder::new(config.contract, config.response_version.clone());
        let pipeline = ValidationPipeline::new(
            config.policy.clone(),
            config.contract.malformed_input_action(),
            Arc::new(StaticClaims::new(config.return_claims.clone())),
        );

        Self::new(
            build_access_guard(config),
            Arc::new(pipeline),
            Arc::new(encoder),
            config.max_body_bytes,
        )
    }
}
