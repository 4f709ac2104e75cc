/*
 * Responsibility
 * - Decision → 応答 JSON (ResponseEnvelope) への変換
 * - Decision → HTTP status の対応
 * - 未設定の optional field は出力しない (null にしない)
 */
use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::contract::Contract;
use crate::services::validation::decision::{Action, Decision};

/// Body returned to the identity platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,

    /// Literal "400" for validation errors on contracts that carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Pass-through claims for the platform to persist (success only).
    #[serde(flatten)]
    pub claims: BTreeMap<String, String>,
}

pub const RESERVED_KEYS: [&str; 5] = ["version", "action", "code", "userMessage", "status"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEncoder {
    contract: Contract,
    version: String,
}

impl ResponseEncoder {
    /// `version` overrides the contract's default tag when given.
    pub fn new(contract: Contract, version: Option<String>) -> Self {
        let version = version.unwrap_or_else(|| contract.default_version().to_string());
        Self { contract, version }
    }

    pub fn encode(&self, decision: &Decision) -> ResponseEnvelope {
        let action = decision.action();

        let code = decision
            .reason()
            .filter(|_| self.contract.emits_code())
            .map(|r| r.code().to_string());

        let status = (self.contract.emits_status() && action == Action::ValidationError)
            .then(|| StatusCode::BAD_REQUEST.as_u16().to_string());

        ResponseEnvelope {
            version: self.version.clone(),
            action: self.contract.action_name(action).to_string(),
            code,
            user_message: decision.message().map(str::to_string),
            status,
            claims: pass_through_claims(decision),
        }
    }

    pub fn status_code(&self, decision: &Decision) -> StatusCode {
        match decision.action() {
            Action::Allow | Action::ShowBlockPage => StatusCode::OK,
            Action::ValidationError => StatusCode::BAD_REQUEST,
        }
    }
}

// Claims may never shadow envelope fields, whatever enricher produced them.
fn pass_through_claims(decision: &Decision) -> BTreeMap<String, String> {
    decision
        .claims()
        .iter()
        .filter(|(key, _)| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                tracing::warn!(claim = %key, "dropping pass-through claim that shadows an envelope field");
            }
            !reserved
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
