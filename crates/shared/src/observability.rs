//! # ログとリクエストスパン
//!
//! API サーバーと seed バイナリが共有するトレーシング初期化。
//!
//! | 環境変数 | 既定値 | 内容 |
//! |---|---|---|
//! | `RUST_LOG` | [`DEFAULT_LOG_FILTER`] | `EnvFilter` の指定 |
//! | `LOG_FORMAT` | `pretty` | `json` で 1 行 1 JSON |
//!
//! HTTP リクエストは `request` スパンで包み、`X-Request-Id` をスパンに載せる。
//! JSON 出力ではイベントごとに現在のスパンのフィールドが付く。

/// Request ID を運ぶヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,gazette=debug,sqlx=warn";

/// ログの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `json` / `pretty` 以外は `None`（大文字小文字を区別する）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// トレーシング初期化の設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// 起動ログに出すサービス名
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    /// `LOG_FORMAT` を読む。解釈できない値は警告を出して `pretty` にする
    ///
    /// subscriber が未初期化の時点で呼ばれるため、警告は stderr に直接書く。
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).unwrap_or_else(|| {
                eprintln!("WARNING: LOG_FORMAT={raw:?} is not json or pretty; using pretty");
                LogFormat::Pretty
            }),
            Err(_) => LogFormat::default(),
        };
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }
}

/// グローバル subscriber を登録する。プロセスで 1 回だけ呼ぶ
///
/// `tracing_error::ErrorLayer` も登録し、`InfraError` が生成時点の
/// `SpanTrace` を取れるようにする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let output = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info!(
        service = %config.service_name,
        format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

/// `TraceLayer::make_span_with` に渡すスパン生成関数
///
/// `SetRequestIdLayer` の内側で呼ばれる前提。ヘッダーがなければ `-`。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// UUID v7 の Request ID
///
/// 時刻順に並ぶので、ID で並べ替えると到着順になる。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let value = http::HeaderValue::try_from(uuid::Uuid::now_v7().to_string()).ok()?;
        Some(tower_http::request_id::RequestId::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_formatは小文字のjsonとprettyのみ受け付ける() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("JSON"), None);
        assert_eq!(LogFormat::parse(""), None);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_request_idはuuid_v7() {
        use tower_http::request_id::MakeRequestId;

        let request = http::Request::builder().uri("/api").body(()).unwrap();
        let id = MakeRequestUuidV7.make_request_id(&request).unwrap();

        let parsed = uuid::Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_request_idは呼ぶたびに異なる() {
        use tower_http::request_id::MakeRequestId;

        let request = http::Request::builder().uri("/api").body(()).unwrap();
        let first = MakeRequestUuidV7.make_request_id(&request).unwrap();
        let second = MakeRequestUuidV7.make_request_id(&request).unwrap();

        assert_ne!(first.header_value(), second.header_value());
    }
}
