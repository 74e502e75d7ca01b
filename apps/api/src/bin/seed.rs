//! # 開発用シード投入
//!
//! マイグレーションを適用し、`seeds/development.sql` を投入する。
//! 既存データは削除される。
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/gazette cargo run -p gazette-api --bin seed
//! ```

use anyhow::Context;
use gazette_api::config::ApiConfig;
use gazette_infra::db;
use gazette_shared::observability::{TracingConfig, init_tracing};

const DEVELOPMENT_SEED: &str = include_str!("../../../../seeds/development.sql");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("gazette-seed"));

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    let pool = db::create_pool(&config.database_url, 1)
        .await
        .context("データベース接続に失敗しました")?;

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;

    sqlx::raw_sql(DEVELOPMENT_SEED)
        .execute(&pool)
        .await
        .context("シードデータの投入に失敗しました")?;

    tracing::info!("シードデータを投入しました");
    pool.close().await;

    Ok(())
}
