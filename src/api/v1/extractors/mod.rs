/*
 * Responsibility
 * - handler 引数として使う extractor 群の公開
 */
mod auth_ctx;

pub use auth_ctx::{ApiKeyCtx, ApiKeyCtxExtractor};
