/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Basic 認証 (AccessGuard) を掛ける範囲もここで決める
 */
use axum::{Router, routing::post};

use crate::api::v1::handlers::signup::validate_signup;
use crate::middleware::auth::basic;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/signup-validation", post(validate_signup));
    basic::apply(router, state)
}
