//! TopicRepository 統合テスト
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://localhost/gazette cargo test -p gazette-infra --test topic_repository_test
//! ```

use gazette_domain::topic::NewTopic;
use gazette_infra::{
    SqlState,
    repository::{PostgresTopicRepository, TopicRepository},
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_all_でslug順に全トピックを取得できる(pool: PgPool) {
    let sut = PostgresTopicRepository::new(pool);

    let topics = sut.find_all().await.unwrap();

    let slugs: Vec<&str> = topics.iter().map(|t| t.slug()).collect();
    assert_eq!(slugs, vec!["cats", "mitch", "paper"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_all_トピックがなければ空(pool: PgPool) {
    let sut = PostgresTopicRepository::new(pool);

    let topics = sut.find_all().await.unwrap();

    assert!(topics.is_empty());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_find_by_slug_で取得できる(pool: PgPool) {
    let sut = PostgresTopicRepository::new(pool);

    let topic = sut.find_by_slug("cats").await.unwrap().unwrap();

    assert_eq!(topic.description(), "Not dogs");
    assert_eq!(topic.img_url(), None);
    assert!(sut.find_by_slug("dogs").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_insert_でトピックを作成できる(pool: PgPool) {
    let sut = PostgresTopicRepository::new(pool);
    let topic = NewTopic::new("cooking", "Hey good looking", Some("https://example.com/c.jpg"))
        .unwrap();

    let created = sut.insert(&topic).await.unwrap();

    assert_eq!(created.slug(), "cooking");
    assert_eq!(created.img_url(), Some("https://example.com/c.jpg"));
    assert_eq!(sut.find_all().await.unwrap().len(), 4);
}

#[sqlx::test(migrations = "../../migrations", fixtures("base"))]
async fn test_insert_重複slugは一意制約違反になる(pool: PgPool) {
    let sut = PostgresTopicRepository::new(pool);
    let topic = NewTopic::new("mitch", "again", None).unwrap();

    let err = sut.insert(&topic).await.unwrap_err();

    assert_eq!(err.sql_state(), Some(SqlState::UniqueViolation));
}
