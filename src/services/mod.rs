/*
 * Responsibility
 * - HTTP に依存しないドメインロジック (handler/middleware から呼ばれる)
 */
pub mod auth;
