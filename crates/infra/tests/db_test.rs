//! データベース接続管理の統合テスト
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://localhost/gazette cargo test -p gazette-infra --test db_test
//! ```

use gazette_infra::db::{self, PgTransactionManager, TransactionManager};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_pingが成功する(pool: PgPool) {
    db::ping(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_マイグレーションでテーブルが作成される(pool: PgPool) {
    let tables: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT table_name::TEXT FROM information_schema.tables
        WHERE table_schema = 'public' AND table_name IN ('topics', 'users', 'articles', 'comments')
        ORDER BY table_name
        "#,
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables, vec!["articles", "comments", "topics", "users"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_空のトランザクションをコミットできる(pool: PgPool) {
    let sut = PgTransactionManager::new(pool);

    let tx = sut.begin().await.unwrap();

    tx.commit().await.unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_閉じたプールではpingが失敗する(pool: PgPool) {
    pool.close().await;

    let result = db::ping(&pool).await;

    assert!(result.is_err());
}
