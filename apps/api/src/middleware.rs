//! # ミドルウェア
//!
//! axum の `from_fn` で組み込むリクエスト単位の処理。

pub mod error_mapping;

pub use error_mapping::map_errors;
