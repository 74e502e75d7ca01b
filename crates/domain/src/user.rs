//! # ユーザー
//!
//! 記事・コメントの投稿者。`username` が一意キーで、`articles.author` と
//! `comments.author` から参照される。
//!
//! ユーザーの作成・更新は扱わない（シードデータで投入する）。

use std::sync::LazyLock;

use regex::Regex;

use crate::DomainError;

/// 空白のみのユーザー名に対するメッセージ
pub const EMPTY_USERNAME: &str = "Username cannot be empty";

/// 許可されない文字を含むユーザー名に対するメッセージ
pub const INVALID_USERNAME_CHARACTERS: &str = "Username contains invalid characters";

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").expect("ユーザー名パターンのコンパイルに失敗しました")
});

/// ユーザー名（値オブジェクト）
///
/// 英数字とアンダースコアのみを許可する。検索キーとして使うため、
/// 前後の空白は除去せず、空白を含む値は不正な文字として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// - 空白のみの場合: `Username cannot be empty`
    /// - `[A-Za-z0-9_]` 以外を含む場合: `Username contains invalid characters`
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation(EMPTY_USERNAME));
        }
        if !USERNAME_PATTERN.is_match(raw) {
            return Err(DomainError::validation(INVALID_USERNAME_CHARACTERS));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username:   String,
    name:       String,
    avatar_url: Option<String>,
}

/// ユーザーの DB 復元パラメータ
pub struct UserRecord {
    pub username:   String,
    pub name:       String,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn from_db(record: UserRecord) -> Self {
        Self {
            username:   record.username,
            name:       record.name,
            avatar_url: record.avatar_url,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}
