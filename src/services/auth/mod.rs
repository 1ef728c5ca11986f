/*
 * Responsibility
 * - 認証まわりの service の公開インターフェース
 */
pub mod api_key;

pub use api_key::{ApiKeyError, fingerprint, get_api_key};
