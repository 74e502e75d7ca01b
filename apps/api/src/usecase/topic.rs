//! トピックのユースケース

use std::sync::Arc;

use gazette_domain::{
    DomainError,
    topic::{NewTopic, SLUG_ALREADY_EXISTS, Topic},
};
use gazette_infra::repository::TopicRepository;

use crate::error::ApiError;

pub struct TopicUseCaseImpl {
    topic_repository: Arc<dyn TopicRepository>,
}

impl TopicUseCaseImpl {
    pub fn new(topic_repository: Arc<dyn TopicRepository>) -> Self {
        Self { topic_repository }
    }

    /// 全トピックを slug 順で取得する
    pub async fn list_topics(&self) -> Result<Vec<Topic>, ApiError> {
        Ok(self.topic_repository.find_all().await?)
    }

    /// トピックを作成する
    ///
    /// 既存の slug は挿入前に検出して 400 `Slug already exists` にする。
    /// 検出後に他のリクエストが同じ slug を挿入した場合は一意制約違反として返る。
    pub async fn create_topic(&self, topic: NewTopic) -> Result<Topic, ApiError> {
        if self
            .topic_repository
            .find_by_slug(topic.slug())
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(SLUG_ALREADY_EXISTS.to_string()).into());
        }

        Ok(self.topic_repository.insert(&topic).await?)
    }
}
