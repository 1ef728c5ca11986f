/*
 * Responsibility
 * - Handler から見える「API key 付きリクエスト」のコンテキスト型
 * - middleware が抽出して request extensions に格納し、handler はこの型だけを受け取る
 */

use crate::services::auth::fingerprint;

/// API key が抽出されたリクエストに付与されるコンテキスト
///
/// - `api_key` は `Authorization: ApiKey <token>` の `<token>` 部分 (未検証)
#[derive(Clone)]
pub struct ApiKeyCtx {
    pub api_key: String,
}

impl ApiKeyCtx {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// ログ/レスポンス相関用。key そのものの代わりに出す
    pub fn key_fingerprint(&self) -> String {
        fingerprint(&self.api_key)
    }
}

// key が Debug 出力 (ログ) に漏れないようにする
impl std::fmt::Debug for ApiKeyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCtx")
            .field("key_fingerprint", &self.key_fingerprint())
            .finish_non_exhaustive()
    }
}
