/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - auth::basic: AccessGuard を route に掛ける
 *   - http: request id / body limit / timeout / trace
 */
pub mod auth;
pub mod http;
