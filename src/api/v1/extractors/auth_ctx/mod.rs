//! `middleware::auth::api_key` が extensions に置いた ApiKeyCtx を handler へ渡す。
//!
//! ApiKeyCtx は抽出済み (未検証) の key だけを持ち、ログには指紋しか出さない。
//! middleware を通っていない route で使うと 401 になる。

mod core;
mod types;

pub use core::ApiKeyCtxExtractor;
pub use types::ApiKeyCtx;
