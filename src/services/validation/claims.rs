/*
 * Responsibility
 * - request body (raw bytes) → SignUpClaims への変換
 * - 使う claim だけを型付きで取り出す (文字列以外は WrongType、変換しない)
 * - 空 / 不正 JSON / object 以外 / 空 object は「入力なし」として None
 */
use serde_json::{Map, Value};

pub const EMAIL: &str = "email";
pub const DISPLAY_NAME: &str = "displayName";
pub const JOB_TITLE: &str = "jobTitle";
pub const UI_LOCALES: &str = "ui_locales";

/// A single claim as it arrived in the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClaimValue {
    /// Key missing, or explicitly `null`.
    #[default]
    Absent,
    Present(String),
    /// Present but not a JSON string.
    WrongType,
}

impl ClaimValue {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(s)) => Self::Present(s.clone()),
            Some(_) => Self::WrongType,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Present and not an empty string.
    pub fn non_empty(&self) -> Option<&str> {
        self.as_str().filter(|s| !s.is_empty())
    }
}

/// Claims the pipeline looks at. Everything else in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpClaims {
    pub email: ClaimValue,
    pub display_name: ClaimValue,
    pub job_title: ClaimValue,
    pub ui_locales: ClaimValue,
    /// Number of keys in the payload that are not consumed here.
    pub other_claims: usize,
}

impl SignUpClaims {
    /// Parse a raw request body. `None` means there is no usable input.
    pub fn parse(body: &[u8]) -> Option<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("request body is empty");
            return None;
        }

        let value: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "request body is not valid JSON");
                return None;
            }
        };

        match value {
            Value::Object(map) if !map.is_empty() => Some(Self::from_map(&map)),
            Value::Object(_) => {
                tracing::debug!("request body is an empty object");
                None
            }
            other => {
                tracing::warn!(kind = json_kind(&other), "request body is not a JSON object");
                None
            }
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let consumed = [EMAIL, DISPLAY_NAME, JOB_TITLE, UI_LOCALES];
        let other_claims = map
            .keys()
            .filter(|k| !consumed.contains(&k.as_str()))
            .count();

        Self {
            email: ClaimValue::from_json(map.get(EMAIL)),
            display_name: ClaimValue::from_json(map.get(DISPLAY_NAME)),
            job_title: ClaimValue::from_json(map.get(JOB_TITLE)),
            ui_locales: ClaimValue::from_json(map.get(UI_LOCALES)),
            other_claims,
        }
    }

    /// Locale hint for logging only. Falls back to "default".
    pub fn language(&self) -> &str {
        self.ui_locales.non_empty().unwrap_or("default")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
