//! # インフラ層エラー
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）と、生成した時点の [`SpanTrace`] を持つ。
//! どのリポジトリ操作の中で失敗したかは SpanTrace から辿る。
//!
//! DB が制約違反などで拒否したエラーは SQLSTATE で分類して
//! [`InfraErrorKind::Rejected`] に入れる。API 層はこの分類だけを見て
//! ステータスコードとメッセージを決め、DB のメッセージはログにのみ出す。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// リポジトリ・接続管理が返すエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// DB が拒否したエラーの SQLSTATE 分類
///
/// API 層で個別の応答に変換する SQLSTATE のみを列挙する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SqlState {
    /// 22P02: 型変換できない文字列（整数列に文字列を渡した等）
    #[display("22P02")]
    InvalidTextRepresentation,
    /// 22003: 数値が列の型の範囲を超えた（投票数の加算で INTEGER を溢れた等）
    #[display("22003")]
    NumericValueOutOfRange,
    /// 23502: NOT NULL 制約違反
    #[display("23502")]
    NotNullViolation,
    /// 23503: 外部キー制約違反
    #[display("23503")]
    ForeignKeyViolation,
    /// 23505: 一意制約違反
    #[display("23505")]
    UniqueViolation,
}

impl SqlState {
    /// SQLSTATE コードから分類する。対象外のコードは `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "22P02" => Some(Self::InvalidTextRepresentation),
            "22003" => Some(Self::NumericValueOutOfRange),
            "23502" => Some(Self::NotNullViolation),
            "23503" => Some(Self::ForeignKeyViolation),
            "23505" => Some(Self::UniqueViolation),
            _ => None,
        }
    }
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 接続断・タイムアウト・分類対象外の SQLSTATE など
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// DB が制約違反などで拒否したエラー
    #[error("DB がリクエストを拒否しました ({state}): {message}")]
    Rejected {
        state:   SqlState,
        /// DB が返したメッセージ（ログ用。クライアントには返さない）
        message: String,
    },

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// DB が拒否したエラーの場合、その SQLSTATE 分類を返す
    pub fn sql_state(&self) -> Option<SqlState> {
        match &self.kind {
            InfraErrorKind::Rejected { state, .. } => Some(*state),
            _ => None,
        }
    }

    /// DB が拒否したエラーを生成する
    ///
    /// インメモリ実装が制約違反を再現するためにも使用する。
    pub fn rejected(state: SqlState, message: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Rejected {
                state,
                message: message.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\n{}", self.kind, self.span_trace)
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        let classified = match &source {
            sqlx::Error::Database(db_error) => db_error
                .code()
                .and_then(|code| SqlState::from_code(&code))
                .map(|state| (state, db_error.message().to_string())),
            _ => None,
        };

        let kind = match classified {
            Some((state, message)) => InfraErrorKind::Rejected { state, message },
            None => InfraErrorKind::Database(source),
        };

        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}
