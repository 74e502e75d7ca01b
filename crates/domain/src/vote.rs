//! # 投票数の増減
//!
//! 記事・コメントの `votes` に加算する値。負の値も許可し、下限は設けない。

use serde_json::Value;

use crate::DomainError;

pub const INVALID_INC_VOTES: &str = "inc_votes must be an integer";

/// 投票数の増減値（値オブジェクト）
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{_0}")]
pub struct VoteDelta(i32);

impl VoteDelta {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// リクエストボディの `inc_votes` を解釈する
    ///
    /// JSON の整数で、i32 に収まる値のみ受け付ける。
    ///
    /// # Errors
    ///
    /// 未指定・null・文字列・小数・範囲外の場合
    pub fn from_json(value: Option<&Value>) -> Result<Self, DomainError> {
        value
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .map(Self)
            .ok_or_else(|| DomainError::validation(INVALID_INC_VOTES))
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}
