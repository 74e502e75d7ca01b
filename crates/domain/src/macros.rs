/// SERIAL 主キーをラップする ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i32` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `from_i32()`: DB の値から復元
/// - `as_i32()`: 内部の値を取得
/// - `parse()`: パスパラメータを解釈し、失敗時は `invalid` のメッセージで
///   `DomainError::Validation` を返す
///
/// # 使用例
///
/// ```rust
/// use gazette_domain::article::ArticleId;
///
/// let id = ArticleId::parse("42").unwrap();
/// assert_eq!(id, ArticleId::from_i32(42));
/// assert!(ArticleId::parse("forty-two").is_err());
/// ```
macro_rules! define_serial_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            invalid: $invalid:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(i32);

        impl $Name {
            /// パスパラメータとして受け取った文字列を ID に変換する
            ///
            /// i32 に収まる整数表記のみ受け付ける。
            pub fn parse(raw: &str) -> Result<Self, $crate::DomainError> {
                raw.parse::<i32>()
                    .map(Self)
                    .map_err(|_| $crate::DomainError::Validation($invalid.to_string()))
            }

            /// DB の値から ID を復元する
            pub fn from_i32(value: i32) -> Self {
                Self(value)
            }

            pub fn as_i32(&self) -> i32 {
                self.0
            }
        }
    };
}

/// 前後の空白を除去し、空でなければ返す
///
/// 作成リクエストの必須フィールドの検証に使う。
pub(crate) fn required_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
