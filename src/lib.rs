/*
 * Responsibility
 * - モジュールの公開 (binary と tests/ から共通に使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
