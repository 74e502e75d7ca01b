//! # データベース接続
//!
//! `main` が起動時に 1 つだけ作るプールと、記事削除のように複数テーブルを
//! まとめて書き換える処理のためのトランザクションを扱う。
//!
//! ```rust,ignore
//! let pool = db::create_pool("postgres://localhost/gazette", 10).await?;
//! db::run_migrations(&pool).await?;
//!
//! let tx_manager = PgTransactionManager::new(pool.clone());
//! let mut tx = tx_manager.begin().await?;
//! comments.delete_by_article(&mut tx, id).await?;
//! articles.delete(&mut tx, id).await?;
//! tx.commit().await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::error::InfraError;

/// プールから接続を取り出すまでの待ち時間の上限
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// `migrations/` の SQL をバイナリに埋め込み、未適用のものだけ順に流す
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// 接続プールを作る。最初の接続に失敗した時点でエラーを返す
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// `SELECT 1` が通るか確認する
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// 書き込みをまとめるトランザクション
///
/// [`commit`](Self::commit) せずにドロップすると、それまでの書き込みは
/// すべて取り消される。インメモリ実装向けの値は DB 接続を持たない。
pub struct TxContext {
    tx: Option<Transaction<'static, Postgres>>,
}

impl TxContext {
    /// DB 接続を持たないトランザクション（インメモリ実装用）
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self { tx: None }
    }

    pub async fn commit(self) -> Result<(), InfraError> {
        if let Some(tx) = self.tx {
            tx.commit().await?;
        }
        Ok(())
    }

    pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, InfraError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| InfraError::unexpected("transaction has no database connection"))
    }
}

/// トランザクションの開始口
///
/// ユースケースはプールを直接持たず、これを通してトランザクションを得る。
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<TxContext, InfraError>;
}

pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        let tx = self.pool.begin().await?;
        Ok(TxContext { tx: Some(tx) })
    }
}
