/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: API key 抽出 / http: request-id, timeout, body limit, trace
 * - cors, security_headers: ブラウザ向けの横断的な設定
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
