/*
 * Responsibility
 * - Authorization ヘッダから `ApiKey <token>` 形式の API key を取り出す
 * - 純粋関数 (ログ出力・I/O なし)。HTTP status への変換は error.rs 側の責務
 * - key の照合/保存はしない (ここは「取り出す」だけ)
 */
use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Authorization ヘッダで受け付ける唯一のスキーム (大文字小文字を区別する)
pub const SCHEME: &str = "ApiKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    #[error("no authorization header included")]
    NoAuthHeaderIncluded,
    #[error("malformed authorization header")]
    MalformedAuthorizationHeader,
}

/// `Authorization: ApiKey <token>` から `<token>` を返す。
///
/// - ヘッダ名の照合は case-insensitive (HeaderMap の仕様)
/// - 値が複数ある場合は先頭のみを見る
/// - `<token>` は最初の空白以降すべて (`ApiKey a b` → `a b`)
pub fn get_api_key(headers: &HeaderMap) -> Result<String, ApiKeyError> {
    let value = match headers.get(header::AUTHORIZATION) {
        None => return Err(ApiKeyError::NoAuthHeaderIncluded),
        Some(v) if v.is_empty() => return Err(ApiKeyError::NoAuthHeaderIncluded),
        Some(v) => v,
    };

    // 非 ASCII などで文字列として読めない値は、存在はするが解釈できないヘッダ扱い
    let value = value
        .to_str()
        .map_err(|_| ApiKeyError::MalformedAuthorizationHeader)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(ApiKeyError::MalformedAuthorizationHeader)?;

    if scheme.is_empty() || token.is_empty() || scheme != SCHEME {
        return Err(ApiKeyError::MalformedAuthorizationHeader);
    }

    Ok(token.to_string())
}

/// ログ相関用の key 指紋 (sha256 の先頭 16 hex)。key そのものはログに出さない
pub fn fingerprint(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    hex::encode(&digest[..8])
}
