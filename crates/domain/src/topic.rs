//! # トピック
//!
//! 記事を分類するトピック。`slug` が一意キーで、記事の `topic` から参照される。

use crate::{DomainError, macros::required_trimmed};

/// トピック作成時に必須フィールドが欠けている場合のメッセージ
pub const MISSING_TOPIC_FIELDS: &str = "Missing required fields";

/// 同じ slug のトピックが既に存在する場合のメッセージ
pub const SLUG_ALREADY_EXISTS: &str = "Slug already exists";

/// トピックエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    slug:        String,
    description: String,
    img_url:     Option<String>,
}

/// トピックの DB 復元パラメータ
pub struct TopicRecord {
    pub slug:        String,
    pub description: String,
    pub img_url:     Option<String>,
}

impl Topic {
    pub fn from_db(record: TopicRecord) -> Self {
        Self {
            slug:        record.slug,
            description: record.description,
            img_url:     record.img_url,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn img_url(&self) -> Option<&str> {
        self.img_url.as_deref()
    }
}

/// トピックの新規作成パラメータ
///
/// 生成時に trim と必須チェックを済ませる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    slug:        String,
    description: String,
    img_url:     Option<String>,
}

impl NewTopic {
    /// # Errors
    ///
    /// `slug` または `description` が空（空白のみを含む）の場合
    pub fn new(slug: &str, description: &str, img_url: Option<&str>) -> Result<Self, DomainError> {
        let (Some(slug), Some(description)) = (required_trimmed(slug), required_trimmed(description))
        else {
            return Err(DomainError::validation(MISSING_TOPIC_FIELDS));
        };

        Ok(Self {
            slug,
            description,
            img_url: img_url.and_then(required_trimmed),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn img_url(&self) -> Option<&str> {
        self.img_url.as_deref()
    }
}
