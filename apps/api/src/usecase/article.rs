//! 記事のユースケース

use std::sync::Arc;

use gazette_domain::{
    DomainError,
    article::{Article, ArticleId, NewArticle},
    listing::{ArticleListQuery, Page},
    vote::VoteDelta,
};
use gazette_infra::{
    db::TransactionManager,
    repository::{ArticleRepository, CommentRepository, TopicRepository},
};

use crate::error::ApiError;

pub struct ArticleUseCaseImpl {
    article_repository: Arc<dyn ArticleRepository>,
    comment_repository: Arc<dyn CommentRepository>,
    topic_repository:   Arc<dyn TopicRepository>,
    tx_manager:         Arc<dyn TransactionManager>,
}

fn article_not_found(id: ArticleId) -> ApiError {
    DomainError::NotFound {
        entity_type: "Article",
        id:          id.to_string(),
    }
    .into()
}

impl ArticleUseCaseImpl {
    pub fn new(
        article_repository: Arc<dyn ArticleRepository>,
        comment_repository: Arc<dyn CommentRepository>,
        topic_repository: Arc<dyn TopicRepository>,
        tx_manager: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            article_repository,
            comment_repository,
            topic_repository,
            tx_manager,
        }
    }

    /// 記事一覧を 1 ページ分取得する
    ///
    /// トピック指定時は先にトピックの存在を確認する。
    /// 存在しないトピックは 404、記事のないトピックは空のページになる。
    pub async fn list_articles(&self, query: &ArticleListQuery) -> Result<Page<Article>, ApiError> {
        if let Some(slug) = query.topic.as_deref()
            && self.topic_repository.find_by_slug(slug).await?.is_none()
        {
            return Err(DomainError::NotFound {
                entity_type: "Topic",
                id:          slug.to_string(),
            }
            .into());
        }

        Ok(self.article_repository.find_page(query).await?)
    }

    pub async fn get_article(&self, id: ArticleId) -> Result<Article, ApiError> {
        self.article_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| article_not_found(id))
    }

    /// 記事を作成する
    ///
    /// 作者・トピックが存在しない場合は外部キー制約違反として返る。
    pub async fn create_article(&self, article: NewArticle) -> Result<Article, ApiError> {
        Ok(self.article_repository.insert(&article).await?)
    }

    pub async fn vote_article(&self, id: ArticleId, delta: VoteDelta) -> Result<Article, ApiError> {
        self.article_repository
            .add_votes(id, delta)
            .await?
            .ok_or_else(|| article_not_found(id))
    }

    /// 記事とそのコメントを同一トランザクションで削除する
    pub async fn delete_article(&self, id: ArticleId) -> Result<(), ApiError> {
        let mut tx = self.tx_manager.begin().await?;

        let removed = self.comment_repository.delete_by_article(&mut tx, id).await?;
        if !self.article_repository.delete(&mut tx, id).await? {
            return Err(article_not_found(id));
        }

        tx.commit().await?;
        tracing::info!(article_id = %id, removed_comments = removed, "記事を削除しました");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gazette_domain::listing::Pagination;
    use gazette_infra::mock::{MockStore, MockTransactionManager};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sut(store: &MockStore) -> ArticleUseCaseImpl {
        ArticleUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockTransactionManager),
        )
    }

    fn seeded() -> MockStore {
        let store = MockStore::new();
        store.add_topic("mitch", "The man");
        store.add_topic("paper", "what books are made of");
        store.add_user("butter_bridge", "jonny");
        store
    }

    fn topic_query(topic: &str) -> ArticleListQuery {
        ArticleListQuery::parse(None, None, Some(topic), None, None).unwrap()
    }

    #[tokio::test]
    async fn test_存在しないトピックは404() {
        let store = seeded();

        let err = sut(&store).list_articles(&topic_query("dogs")).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Topic not found"));
    }

    #[tokio::test]
    async fn test_記事のないトピックは空のページ() {
        let store = seeded();
        store.add_article("A", "mitch", "butter_bridge", 0);

        let page = sut(&store).list_articles(&topic_query("paper")).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_get_articleはコメント数を含む() {
        let store = seeded();
        let id = store.add_article("A", "mitch", "butter_bridge", 0);
        store.add_comment(id, "butter_bridge", 0);
        store.add_comment(id, "butter_bridge", 0);

        let article = sut(&store).get_article(id).await.unwrap();

        assert_eq!(article.comment_count(), 2);
    }

    #[tokio::test]
    async fn test_存在しない記事の投票は404() {
        let store = seeded();

        let err = sut(&store)
            .vote_article(ArticleId::from_i32(1), VoteDelta::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Article not found"));
    }

    #[tokio::test]
    async fn test_delete_articleでコメントも削除される() {
        let store = seeded();
        let id = store.add_article("A", "mitch", "butter_bridge", 0);
        store.add_comment(id, "butter_bridge", 0);
        store.add_comment(id, "butter_bridge", 0);
        let sut = sut(&store);

        sut.delete_article(id).await.unwrap();

        assert!(store.comment_ids_of(id).is_empty());
        let err = sut.get_article(id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_存在しない記事の削除は404() {
        let store = seeded();

        let err = sut(&store)
            .delete_article(ArticleId::from_i32(42))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Article not found"));
    }

    #[tokio::test]
    async fn test_未登録の作者は外部キー違反() {
        let store = seeded();
        let article = NewArticle::new("nobody", "T", "B", "mitch", None).unwrap();

        let err = sut(&store).create_article(article).await.unwrap_err();

        assert!(matches!(err, ApiError::Database(_)));
    }

    #[tokio::test]
    async fn test_ページ外は空で総件数は変わらない() {
        let store = seeded();
        for i in 0..3 {
            store.add_article(&format!("A{i}"), "mitch", "butter_bridge", 0);
        }
        let query = ArticleListQuery {
            pagination: Pagination::parse(Some("2"), Some("3")).unwrap(),
            ..ArticleListQuery::default()
        };

        let page = sut(&store).list_articles(&query).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }
}
