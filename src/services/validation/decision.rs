/*
 * Responsibility
 * - pipeline の唯一の出力 (Decision) の定義
 * - 不変条件はコンストラクタで保証する
 *   - Allow のとき Rejection なし / pass-through claims あり得る
 *   - それ以外は必ず Rejection (message) あり / claims なし
 */
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Allow,
    ShowBlockPage,
    ValidationError,
}

/// Outcome for a request body that cannot be used. Never `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInput {
    ShowBlockPage,
    ValidationError,
}

/// Why a sign-up was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    InvalidInput,
    EmailMandatory,
    DomainNotAllowed,
    ClaimMissing,
    ClaimTooShort,
}

impl Reason {
    /// Machine-readable code for contracts that carry one.
    pub fn code(&self) -> &'static str {
        match self {
            Reason::InvalidInput => "InvalidInput",
            Reason::EmailMandatory => "EmailMandatory",
            Reason::DomainNotAllowed => "DomainNotAllowed",
            Reason::ClaimMissing => "ClaimMissing",
            Reason::ClaimTooShort => "ClaimTooShort",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: Reason,
    pub message: String,
}

impl Rejection {
    pub fn new(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    action: Action,
    rejection: Option<Rejection>,
    claims: BTreeMap<String, String>,
}

impl Decision {
    pub fn allow(claims: BTreeMap<String, String>) -> Self {
        Self {
            action: Action::Allow,
            rejection: None,
            claims,
        }
    }

    pub fn block(rejection: Rejection) -> Self {
        Self {
            action: Action::ShowBlockPage,
            rejection: Some(rejection),
            claims: BTreeMap::new(),
        }
    }

    pub fn invalid(rejection: Rejection) -> Self {
        Self {
            action: Action::ValidationError,
            rejection: Some(rejection),
            claims: BTreeMap::new(),
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_allowed(&self) -> bool {
        self.action == Action::Allow
    }

    pub fn reason(&self) -> Option<Reason> {
        self.rejection.as_ref().map(|r| r.reason)
    }

    pub fn message(&self) -> Option<&str> {
        self.rejection.as_ref().map(|r| r.message.as_str())
    }

    pub fn claims(&self) -> &BTreeMap<String, String> {
        &self.claims
    }
}
