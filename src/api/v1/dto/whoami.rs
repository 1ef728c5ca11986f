use serde::Serialize;

use crate::api::v1::extractors::ApiKeyCtx;
use crate::services::auth::api_key::SCHEME;

/// GET /whoami のレスポンス (key 本体は返さない)
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub scheme: &'static str,
    pub key_fingerprint: String,
}

impl From<&ApiKeyCtx> for WhoamiResponse {
    fn from(ctx: &ApiKeyCtx) -> Self {
        Self {
            scheme: SCHEME,
            key_fingerprint: ctx.key_fingerprint(),
        }
    }
}
