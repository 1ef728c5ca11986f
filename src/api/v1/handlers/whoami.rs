/*
 * Responsibility
 * - GET /whoami (API key 必須)
 * - middleware が抽出した key の指紋を返す。照合はしない
 */
use axum::Json;

use crate::api::v1::dto::whoami::WhoamiResponse;
use crate::api::v1::extractors::ApiKeyCtxExtractor;

pub async fn whoami(ApiKeyCtxExtractor(ctx): ApiKeyCtxExtractor) -> Json<WhoamiResponse> {
    Json(WhoamiResponse::from(&ctx))
}
