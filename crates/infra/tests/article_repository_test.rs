//! ArticleRepository 統合テスト
//!
//! データベースを使用したテスト。sqlx::test マクロがテストごとに
//! データベースを作成し、マイグレーションと `fixtures/base.sql` を適用する。
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://localhost/gazette cargo test -p gazette-infra --test article_repository_test
//! ```

mod common;

use common::{
    MITCH_ARTICLES,
    TOTAL_ARTICLES,
    article_query,
    article_with_comments,
    article_without_comments,
    missing_article,
    pagination,
};
use gazette_domain::{
    article::{ArticleId, DEFAULT_ARTICLE_IMG_URL, NewArticle},
    listing::ArticleListQuery,
    vote::VoteDelta,
};
use gazette_infra::{
    SqlState,
    db::{PgTransactionManager, TransactionManager},
    repository::{
        ArticleRepository,
        CommentRepository,
        PostgresArticleRepository,
        PostgresCommentRepository,
    },
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_by_id_でコメント数付きの記事を取得できる(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let article = sut.find_by_id(article_with_comments()).await.unwrap().unwrap();

    assert_eq!(article.title(), "Living in the shadow of a great man");
    assert_eq!(article.topic(), "mitch");
    assert_eq!(article.author(), "butter_bridge");
    assert_eq!(article.votes(), 100);
    assert_eq!(article.comment_count(), 11);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_by_id_コメントのない記事はcomment_count0(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let article = sut.find_by_id(article_without_comments()).await.unwrap().unwrap();

    assert_eq!(article.comment_count(), 0);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_by_id_存在しない記事はnoneを返す(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let result = sut.find_by_id(missing_article()).await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_exists_で存在確認できる(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    assert!(sut.exists(article_with_comments()).await.unwrap());
    assert!(!sut.exists(missing_article()).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_既定はcreated_at降順で10件(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let page = sut.find_page(&ArticleListQuery::default()).await.unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total_count, TOTAL_ARTICLES);
    assert_eq!(page.items[0].id(), ArticleId::from_i32(3));
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].created_at() >= w[1].created_at()),
        "created_at の降順であること"
    );
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_votes昇順で並ぶ(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);
    let mut query = article_query(Some("votes"), Some("asc"), None);
    query.pagination = pagination(20, 1);

    let page = sut.find_page(&query).await.unwrap();

    assert_eq!(page.items.len(), TOTAL_ARTICLES as usize);
    assert!(page.items.windows(2).all(|w| w[0].votes() <= w[1].votes()));
    assert_eq!(page.items.last().unwrap().id(), article_with_comments());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_comment_count降順で並ぶ(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let page = sut
        .find_page(&article_query(Some("comment_count"), None, None))
        .await
        .unwrap();

    assert_eq!(page.items[0].id(), article_with_comments());
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].comment_count() >= w[1].comment_count())
    );
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_idはarticle_idの別名として扱う(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let page = sut
        .find_page(&article_query(Some("id"), Some("asc"), None))
        .await
        .unwrap();

    let ids: Vec<i32> = page.items.iter().map(|a| a.id().as_i32()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_topicで絞り込める(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let page = sut
        .find_page(&article_query(None, None, Some("cats")))
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].topic(), "cats");
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_記事のないtopicは空ページを返す(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let page = sut
        .find_page(&article_query(None, None, Some("paper")))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_page_total_countはページによらず一定(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);
    let mut query = article_query(None, None, Some("mitch"));

    query.pagination = pagination(5, 1);
    let first = sut.find_page(&query).await.unwrap();
    query.pagination = pagination(5, 3);
    let last = sut.find_page(&query).await.unwrap();
    query.pagination = pagination(5, 4);
    let past_end = sut.find_page(&query).await.unwrap();

    assert_eq!(first.items.len(), 5);
    assert_eq!(last.items.len(), 2);
    assert!(past_end.items.is_empty());
    assert_eq!(first.total_count, MITCH_ARTICLES);
    assert_eq!(last.total_count, MITCH_ARTICLES);
    assert_eq!(past_end.total_count, MITCH_ARTICLES);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_insert_で記事を作成できる(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);
    let article = NewArticle::new("lurker", "New", "Fresh body", "paper", None).unwrap();

    let created = sut.insert(&article).await.unwrap();

    assert_eq!(created.id(), ArticleId::from_i32(14));
    assert_eq!(created.author(), "lurker");
    assert_eq!(created.votes(), 0);
    assert_eq!(created.comment_count(), 0);
    assert_eq!(created.article_img_url(), Some(DEFAULT_ARTICLE_IMG_URL));
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_insert_存在しないtopicは外部キー違反になる(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);
    let article = NewArticle::new("lurker", "New", "Body", "dogs", None).unwrap();

    let err = sut.insert(&article).await.unwrap_err();

    assert_eq!(err.sql_state(), Some(SqlState::ForeignKeyViolation));
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_add_votes_で投票数を加算できる(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let updated = sut
        .add_votes(article_with_comments(), VoteDelta::new(-101))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.votes(), -1);
    assert_eq!(updated.comment_count(), 11);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_add_votes_0では投票数が変わらない(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let updated = sut
        .add_votes(article_with_comments(), VoteDelta::new(0))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.votes(), 100);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_add_votes_integerを溢れると範囲外エラー(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let err = sut
        .add_votes(article_with_comments(), VoteDelta::new(i32::MAX))
        .await
        .unwrap_err();

    assert_eq!(err.sql_state(), Some(SqlState::NumericValueOutOfRange));
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_add_votes_存在しない記事はnoneを返す(pool: PgPool) {
    let sut = PostgresArticleRepository::new(pool);

    let result = sut.add_votes(missing_article(), VoteDelta::new(1)).await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_delete_コメントと同じトランザクションで削除できる(pool: PgPool) {
    let tx_manager = PgTransactionManager::new(pool.clone());
    let comments = PostgresCommentRepository::new(pool.clone());
    let sut = PostgresArticleRepository::new(pool.clone());
    let id = article_with_comments();

    let mut tx = tx_manager.begin().await.unwrap();
    let removed = comments.delete_by_article(&mut tx, id).await.unwrap();
    let deleted = sut.delete(&mut tx, id).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(removed, 11);
    assert!(deleted);
    assert!(sut.find_by_id(id).await.unwrap().is_none());
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE article_id = $1")
        .bind(id.as_i32())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_delete_コメントが残っていると外部キー違反になる(pool: PgPool) {
    let tx_manager = PgTransactionManager::new(pool.clone());
    let sut = PostgresArticleRepository::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let err = sut.delete(&mut tx, article_with_comments()).await.unwrap_err();

    assert_eq!(err.sql_state(), Some(SqlState::ForeignKeyViolation));
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_delete_コミットせずにドロップするとロールバックされる(pool: PgPool) {
    let tx_manager = PgTransactionManager::new(pool.clone());
    let comments = PostgresCommentRepository::new(pool.clone());
    let sut = PostgresArticleRepository::new(pool);
    let id = article_with_comments();

    {
        let mut tx = tx_manager.begin().await.unwrap();
        comments.delete_by_article(&mut tx, id).await.unwrap();
        sut.delete(&mut tx, id).await.unwrap();
    }

    let article = sut.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(article.comment_count(), 11);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_delete_存在しない記事はfalseを返す(pool: PgPool) {
    let tx_manager = PgTransactionManager::new(pool.clone());
    let sut = PostgresArticleRepository::new(pool);

    let mut tx = tx_manager.begin().await.unwrap();
    let deleted = sut.delete(&mut tx, missing_article()).await.unwrap();

    assert!(!deleted);
}
