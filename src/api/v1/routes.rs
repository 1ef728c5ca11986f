/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - API key が必要な範囲 (protected) と不要な範囲 (public) をここで分ける
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, whoami::whoami};
use crate::middleware::auth::api_key;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let protected = api_key::apply(Router::new().route("/whoami", get(whoami)));

    Router::new().route("/health", get(health)).merge(protected)
}
