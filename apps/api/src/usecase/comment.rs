//! コメントのユースケース

use std::sync::Arc;

use gazette_domain::{
    DomainError,
    article::ArticleId,
    comment::{Comment, CommentId, NewComment},
    listing::{Page, Pagination},
    vote::VoteDelta,
};
use gazette_infra::repository::{ArticleRepository, CommentRepository};

use crate::error::ApiError;

pub struct CommentUseCaseImpl {
    article_repository: Arc<dyn ArticleRepository>,
    comment_repository: Arc<dyn CommentRepository>,
}

fn comment_not_found(id: CommentId) -> ApiError {
    DomainError::NotFound {
        entity_type: "Comment",
        id:          id.to_string(),
    }
    .into()
}

impl CommentUseCaseImpl {
    pub fn new(
        article_repository: Arc<dyn ArticleRepository>,
        comment_repository: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            article_repository,
            comment_repository,
        }
    }

    /// 記事のコメントを新しい順に 1 ページ分取得する
    ///
    /// 記事が存在しなければ 404。コメントのない記事は空のページになる。
    pub async fn list_comments(
        &self,
        article_id: ArticleId,
        pagination: Pagination,
    ) -> Result<Page<Comment>, ApiError> {
        if !self.article_repository.exists(article_id).await? {
            return Err(DomainError::NotFound {
                entity_type: "Article",
                id:          article_id.to_string(),
            }
            .into());
        }

        Ok(self
            .comment_repository
            .find_page_by_article(article_id, pagination)
            .await?)
    }

    /// コメントを作成する
    ///
    /// 記事・投稿者が存在しない場合は外部キー制約違反として返る。
    pub async fn create_comment(&self, comment: NewComment) -> Result<Comment, ApiError> {
        Ok(self.comment_repository.insert(&comment).await?)
    }

    pub async fn vote_comment(&self, id: CommentId, delta: VoteDelta) -> Result<Comment, ApiError> {
        self.comment_repository
            .add_votes(id, delta)
            .await?
            .ok_or_else(|| comment_not_found(id))
    }

    pub async fn delete_comment(&self, id: CommentId) -> Result<(), ApiError> {
        if !self.comment_repository.delete(id).await? {
            return Err(comment_not_found(id));
        }
        Ok(())
    }
}
