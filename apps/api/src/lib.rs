//! # Gazette API
//!
//! 記事・コメント・トピック・ユーザーを扱うニュースアグリゲーター REST API。
//!
//! ## レイヤー構成
//!
//! ```text
//! Router（app_builder）
//!    ↓
//! handler: パス・クエリ・ボディの解析、DTO への変換
//!    ↓
//! usecase: 存在確認・トランザクション
//!    ↓
//! gazette_infra::repository: SQL の発行
//! ```
//!
//! ハンドラが返した [`error::ApiError`] は [`middleware::map_errors`] が
//! `{"msg": "..."}` 形式のレスポンスに変換する。
//!
//! ## モジュール構成
//!
//! - [`app_builder`]: ルーターの構築
//! - [`config`]: 環境変数からの設定読み込み
//! - [`error`]: エラー型とステータスコードへの変換規則
//! - [`extract`]: `{"msg"}` 形式で失敗する抽出器
//! - [`handler`]: HTTP ハンドラ
//! - [`middleware`]: エラー変換ミドルウェア
//! - [`usecase`]: ビジネスロジック

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod usecase;
