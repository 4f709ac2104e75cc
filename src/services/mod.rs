/*
 * Responsibility
 * - HTTP に依存しないドメインロジック
 *   - auth: Basic 認証の検証 (AccessGuard)
 *   - validation: claim の順序付きチェック → Decision
 *   - response: Decision → 契約ごとの応答 JSON
 */
pub mod auth;
pub mod response;
pub mod validation;
