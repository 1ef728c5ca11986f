//! `Authorization: ApiKey <token>` を取り出す → ApiKeyCtx を extensions に入れる
//!
//! - 抽出ロジックそのものは `services::auth::api_key` (純粋関数) に置く
//! - ここは HTTP との配線と、拒否時のログ出力だけを担当する
//! - key の照合 (DB など) は行わない

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::ApiKeyCtx;
use crate::error::AppError;
use crate::services::auth::get_api_key;
use crate::state::AppState;

/// 保護したい route 群に API key 抽出を掛ける。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/whoami", get(whoami));
/// let protected = middleware::auth::api_key::apply(protected);
/// ```
pub fn apply(router: Router<AppState>) -> Router<AppState> {
    // route_layer: マッチしなかったリクエストは 401 ではなく 404 のまま
    router.route_layer(middleware::from_fn(api_key_middleware))
}

async fn api_key_middleware(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let api_key = match get_api_key(req.headers()) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "api key extraction failed"
            );
            return Err(err.into());
        }
    };

    let ctx = ApiKeyCtx::new(api_key);
    tracing::debug!(key_fingerprint = %ctx.key_fingerprint(), "api key extracted");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
