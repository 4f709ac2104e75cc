//! Response contracts understood by the identity platform.
//!
//! Each integration revision expects a slightly different JSON shape. The
//! in-memory `Decision` is the same for all of them; a `Contract` only decides
//! how it is written on the wire.

use std::fmt;
use std::str::FromStr;

use crate::services::validation::decision::{Action, MalformedInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contract {
    /// `Continue` on success, `userMessage` on failure, nothing else.
    Legacy,
    /// `Allow` on success, `code` + `userMessage` on failure.
    Coded,
    /// `Continue` on success, `userMessage` on failure and `status: "400"`
    /// for validation errors.
    #[default]
    Status,
}

impl Contract {
    pub fn default_version(&self) -> &'static str {
        match self {
            Contract::Legacy | Contract::Status => "1.0.0",
            Contract::Coded => "1.0.1",
        }
    }

    pub fn action_name(&self, action: Action) -> &'static str {
        match (self, action) {
            (Contract::Coded, Action::Allow) => "Allow",
            (_, Action::Allow) => "Continue",
            (_, Action::ShowBlockPage) => "ShowBlockPage",
            (_, Action::ValidationError) => "ValidationError",
        }
    }

    /// What an unusable request body turns into.
    pub fn malformed_input_action(&self) -> MalformedInput {
        match self {
            Contract::Legacy | Contract::Coded => MalformedInput::ShowBlockPage,
            Contract::Status => MalformedInput::ValidationError,
        }
    }

    pub fn emits_code(&self) -> bool {
        matches!(self, Contract::Coded)
    }

    pub fn emits_status(&self) -> bool {
        matches!(self, Contract::Status)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown response contract: {0}")]
pub struct UnknownContract(String);

impl FromStr for Contract {
    type Err = UnknownContract;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Contract::Legacy),
            "coded" => Ok(Contract::Coded),
            "status" => Ok(Contract::Status),
            _ => Err(UnknownContract(s.to_string())),
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Contract::Legacy => "legacy",
            Contract::Coded => "coded",
            Contract::Status => "status",
        };
        f.write_str(name)
    }
}
