//! # テスト用インメモリリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! gazette-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 4 つのリポジトリトレイトを 1 つの [`MockStore`] が実装し、状態を共有する。
//! 外部キー制約と一意制約は PostgreSQL と同じ SQLSTATE の
//! [`InfraError::rejected`] で再現する。

use std::{
    cmp::Ordering,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gazette_domain::{
    article::{Article, ArticleId, ArticleRecord, NewArticle},
    comment::{Comment, CommentId, CommentRecord, NewComment},
    listing::{ArticleListQuery, ArticleSortKey, Page, Pagination, SortOrder},
    topic::{NewTopic, Topic, TopicRecord},
    user::{User, UserRecord, Username},
    vote::VoteDelta,
};

use crate::{
    db::{TransactionManager, TxContext},
    error::{InfraError, SqlState},
    repository::{ArticleRepository, CommentRepository, TopicRepository, UserRepository},
};

/// 作成日時の基準（2020-01-01T00:00:00Z）
const BASE_TIMESTAMP: i64 = 1_577_836_800;

#[derive(Default)]
struct State {
    topics:          Vec<Topic>,
    users:           Vec<User>,
    /// `comment_count` は読み出し時に算出するため 0 で保持する
    articles:        Vec<Article>,
    comments:        Vec<Comment>,
    last_article_id: i32,
    last_comment_id: i32,
    ticks:           i64,
    unavailable:     bool,
}

impl State {
    /// 登録順に 1 時間ずつ進む作成日時
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::from_timestamp(BASE_TIMESTAMP, 0).unwrap_or_default() + Duration::hours(self.ticks)
    }

    fn ensure_available(&self) -> Result<(), InfraError> {
        if self.unavailable {
            return Err(InfraError::unexpected("mock store is unavailable"));
        }
        Ok(())
    }

    fn comment_count(&self, id: ArticleId) -> i64 {
        self.comments.iter().filter(|c| c.article_id() == id).count() as i64
    }

    fn with_comment_count(&self, article: &Article) -> Article {
        article_with(article, article.votes(), self.comment_count(article.id()))
    }

    fn topic_exists(&self, slug: &str) -> bool {
        self.topics.iter().any(|t| t.slug() == slug)
    }

    fn user_exists(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username() == username)
    }

    fn article_exists(&self, id: ArticleId) -> bool {
        self.articles.iter().any(|a| a.id() == id)
    }
}

fn article_with(article: &Article, votes: i32, comment_count: i64) -> Article {
    Article::from_db(ArticleRecord {
        id: article.id(),
        title: article.title().to_string(),
        body: article.body().to_string(),
        topic: article.topic().to_string(),
        author: article.author().to_string(),
        created_at: article.created_at(),
        votes,
        article_img_url: article.article_img_url().map(str::to_string),
        comment_count,
    })
}

fn comment_with_votes(comment: &Comment, votes: i32) -> Comment {
    Comment::from_db(CommentRecord {
        id: comment.id(),
        article_id: comment.article_id(),
        body: comment.body().to_string(),
        author: comment.author().to_string(),
        votes,
        created_at: comment.created_at(),
    })
}

fn compare_articles(a: &Article, b: &Article, key: ArticleSortKey) -> Ordering {
    match key {
        ArticleSortKey::ArticleId => a.id().as_i32().cmp(&b.id().as_i32()),
        ArticleSortKey::Title => a.title().cmp(b.title()),
        ArticleSortKey::Author => a.author().cmp(b.author()),
        ArticleSortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        ArticleSortKey::Votes => a.votes().cmp(&b.votes()),
        ArticleSortKey::CommentCount => a.comment_count().cmp(&b.comment_count()),
    }
}

fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total_count = items.len() as i64;
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let items = items
        .into_iter()
        .skip(offset)
        .take(pagination.limit() as usize)
        .collect();
    Page { items, total_count }
}

/// INTEGER 列の `votes + $1` と同じく、溢れたら 22003
fn add_votes_checked(votes: i32, delta: VoteDelta) -> Result<i32, InfraError> {
    votes.checked_add(delta.as_i32()).ok_or_else(|| {
        InfraError::rejected(SqlState::NumericValueOutOfRange, "integer out of range")
    })
}

fn foreign_key_violation(detail: &str) -> InfraError {
    InfraError::rejected(SqlState::ForeignKeyViolation, detail)
}

/// 4 つのリポジトリを兼ねるインメモリストア
///
/// `Clone` しても同じ状態を共有する。
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<State>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_topic(&self, slug: &str, description: &str) {
        self.state.lock().unwrap().topics.push(Topic::from_db(TopicRecord {
            slug:        slug.to_string(),
            description: description.to_string(),
            img_url:     None,
        }));
    }

    pub fn add_user(&self, username: &str, name: &str) {
        self.state.lock().unwrap().users.push(User::from_db(UserRecord {
            username:   username.to_string(),
            name:       name.to_string(),
            avatar_url: None,
        }));
    }

    /// 記事を直接登録する（外部キーは検証しない）
    pub fn add_article(&self, title: &str, topic: &str, author: &str, votes: i32) -> ArticleId {
        let mut state = self.state.lock().unwrap();
        state.last_article_id += 1;
        let id = ArticleId::from_i32(state.last_article_id);
        let created_at = state.next_timestamp();
        state.articles.push(Article::from_db(ArticleRecord {
            id,
            title: title.to_string(),
            body: format!("{title} body"),
            topic: topic.to_string(),
            author: author.to_string(),
            created_at,
            votes,
            article_img_url: None,
            comment_count: 0,
        }));
        id
    }

    /// コメントを直接登録する（外部キーは検証しない）
    pub fn add_comment(&self, article_id: ArticleId, author: &str, votes: i32) -> CommentId {
        let mut state = self.state.lock().unwrap();
        state.last_comment_id += 1;
        let id = CommentId::from_i32(state.last_comment_id);
        let created_at = state.next_timestamp();
        state.comments.push(Comment::from_db(CommentRecord {
            id,
            article_id,
            body: format!("comment {id}"),
            author: author.to_string(),
            votes,
            created_at,
        }));
        id
    }

    /// 以降の操作をすべて失敗させる（500 応答の確認用）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    pub fn comment_ids_of(&self, article_id: ArticleId) -> Vec<CommentId> {
        self.state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.article_id() == article_id)
            .map(Comment::id)
            .collect()
    }
}

#[async_trait]
impl TopicRepository for MockStore {
    async fn find_all(&self) -> Result<Vec<Topic>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        let mut topics = state.topics.clone();
        topics.sort_by(|a, b| a.slug().cmp(b.slug()));
        Ok(topics)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Topic>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        Ok(state.topics.iter().find(|t| t.slug() == slug).cloned())
    }

    async fn insert(&self, topic: &NewTopic) -> Result<Topic, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        if state.topic_exists(topic.slug()) {
            return Err(InfraError::rejected(
                SqlState::UniqueViolation,
                "duplicate key value violates unique constraint \"topics_pkey\"",
            ));
        }
        let created = Topic::from_db(TopicRecord {
            slug:        topic.slug().to_string(),
            description: topic.description().to_string(),
            img_url:     topic.img_url().map(str::to_string),
        });
        state.topics.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        let mut users = state.users.clone();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(users)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        Ok(state
            .users
            .iter()
            .find(|u| u.username() == username.as_str())
            .cloned())
    }
}

#[async_trait]
impl ArticleRepository for MockStore {
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        Ok(state
            .articles
            .iter()
            .find(|a| a.id() == id)
            .map(|a| state.with_comment_count(a)))
    }

    async fn exists(&self, id: ArticleId) -> Result<bool, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        Ok(state.article_exists(id))
    }

    async fn find_page(&self, query: &ArticleListQuery) -> Result<Page<Article>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        let mut articles: Vec<Article> = state
            .articles
            .iter()
            .filter(|a| query.topic.as_deref().is_none_or(|topic| a.topic() == topic))
            .map(|a| state.with_comment_count(a))
            .collect();
        articles.sort_by(|a, b| {
            let ordering = compare_articles(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(paginate(articles, query.pagination))
    }

    async fn insert(&self, article: &NewArticle) -> Result<Article, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        if !state.topic_exists(article.topic()) || !state.user_exists(article.author()) {
            return Err(foreign_key_violation(
                "insert or update on table \"articles\" violates foreign key constraint",
            ));
        }
        state.last_article_id += 1;
        let created_at = state.next_timestamp();
        let created = Article::from_db(ArticleRecord {
            id: ArticleId::from_i32(state.last_article_id),
            title: article.title().to_string(),
            body: article.body().to_string(),
            topic: article.topic().to_string(),
            author: article.author().to_string(),
            created_at,
            votes: 0,
            article_img_url: Some(article.article_img_url().to_string()),
            comment_count: 0,
        });
        state.articles.push(created.clone());
        Ok(created)
    }

    async fn add_votes(
        &self,
        id: ArticleId,
        delta: VoteDelta,
    ) -> Result<Option<Article>, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        let comment_count = state.comment_count(id);
        let Some(stored) = state.articles.iter_mut().find(|a| a.id() == id) else {
            return Ok(None);
        };
        let votes = add_votes_checked(stored.votes(), delta)?;
        *stored = article_with(stored, votes, 0);
        Ok(Some(article_with(stored, stored.votes(), comment_count)))
    }

    async fn delete(&self, _tx: &mut TxContext, id: ArticleId) -> Result<bool, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        if state.comments.iter().any(|c| c.article_id() == id) {
            return Err(foreign_key_violation(
                "update or delete on table \"articles\" violates foreign key constraint",
            ));
        }
        let before = state.articles.len();
        state.articles.retain(|a| a.id() != id);
        Ok(state.articles.len() < before)
    }
}

#[async_trait]
impl CommentRepository for MockStore {
    async fn find_page_by_article(
        &self,
        article_id: ArticleId,
        pagination: Pagination,
    ) -> Result<Page<Comment>, InfraError> {
        let state = self.state.lock().unwrap();
        state.ensure_available()?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.article_id() == article_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        Ok(paginate(comments, pagination))
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        if !state.article_exists(comment.article_id()) || !state.user_exists(comment.author()) {
            return Err(foreign_key_violation(
                "insert or update on table \"comments\" violates foreign key constraint",
            ));
        }
        state.last_comment_id += 1;
        let created_at = state.next_timestamp();
        let created = Comment::from_db(CommentRecord {
            id: CommentId::from_i32(state.last_comment_id),
            article_id: comment.article_id(),
            body: comment.body().to_string(),
            author: comment.author().to_string(),
            votes: 0,
            created_at,
        });
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn add_votes(
        &self,
        id: CommentId,
        delta: VoteDelta,
    ) -> Result<Option<Comment>, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        let Some(stored) = state.comments.iter_mut().find(|c| c.id() == id) else {
            return Ok(None);
        };
        let votes = add_votes_checked(stored.votes(), delta)?;
        *stored = comment_with_votes(stored, votes);
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        let before = state.comments.len();
        state.comments.retain(|c| c.id() != id);
        Ok(state.comments.len() < before)
    }

    async fn delete_by_article(
        &self,
        _tx: &mut TxContext,
        article_id: ArticleId,
    ) -> Result<u64, InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_available()?;
        let before = state.comments.len();
        state.comments.retain(|c| c.article_id() != article_id);
        Ok((before - state.comments.len()) as u64)
    }
}

/// トランザクションを持たない TransactionManager
#[derive(Clone, Default)]
pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        Ok(TxContext::mock())
    }
}
