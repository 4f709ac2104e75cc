//! Factory: build `AccessGuard` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AccessGuard;

pub fn build_access_guard(config: &Config) -> Arc<AccessGuard> {
    let guard = AccessGuard::new(config.basic_auth.clone());

    if guard.is_enabled() {
        tracing::info!("HTTP basic authentication enabled");
    } else {
        tracing::warn!("HTTP basic authentication disabled; every caller is authorized");
    }

    Arc::new(guard)
}
