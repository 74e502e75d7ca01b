//! # Gazette API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（デフォルト: `9090`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | 最大接続数（デフォルト: `10`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p gazette-api
//!
//! # 本番環境
//! API_PORT=9090 DATABASE_URL=postgres://... LOG_FORMAT=json cargo run -p gazette-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use gazette_api::{
    app_builder::{Repositories, build_app},
    config::ApiConfig,
    handler::ReadinessState,
};
use gazette_infra::db;
use gazette_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("gazette-api"));

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });
    let app = build_app(Repositories::postgres(&pool), readiness_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
