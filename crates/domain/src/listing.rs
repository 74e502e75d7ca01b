//! # 一覧取得条件
//!
//! 記事一覧・コメント一覧のクエリパラメータを検証し、型付きの条件に変換する。
//!
//! 並び替えキーと順序は許可リストの列挙型に限定する。SQL 断片への変換は
//! infra 層が固定の対応表で行うため、利用者の入力が SQL 文字列に混入しない。
//!
//! 検証順序は `sort_by` → `order` → `limit` → `p` で、最初に失敗した項目の
//! メッセージを返す。

use std::str::FromStr;

use crate::DomainError;

pub const INVALID_SORT_BY: &str = "Invalid sort_by query";
pub const INVALID_ORDER: &str = "Invalid order query";
pub const INVALID_LIMIT: &str = "Invalid limit query";
pub const INVALID_PAGE: &str = "Invalid page query";

/// ページサイズ未指定時の件数
pub const DEFAULT_LIMIT: u32 = 10;

/// 記事一覧の並び替えキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ArticleSortKey {
    #[strum(serialize = "article_id", serialize = "id")]
    ArticleId,
    Title,
    Author,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl ArticleSortKey {
    /// 未指定なら `created_at`
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Self::default()),
            Some(value) => {
                Self::from_str(value).map_err(|_| DomainError::validation(INVALID_SORT_BY))
            }
        }
    }
}

/// 並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// 未指定なら `desc`
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Self::default()),
            Some(value) => Self::from_str(value).map_err(|_| DomainError::validation(INVALID_ORDER)),
        }
    }
}

/// ページング条件
///
/// `limit` と `page` はいずれも 1 以上。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: u32,
    page:  u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page:  1,
        }
    }
}

impl Pagination {
    /// `limit` → `page` の順に検証する
    ///
    /// 0・負数・数値以外はエラー。未指定なら既定値（limit 10, page 1）。
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Self, DomainError> {
        let limit = parse_positive(limit, INVALID_LIMIT)?.unwrap_or(DEFAULT_LIMIT);
        let page = parse_positive(page, INVALID_PAGE)?.unwrap_or(1);
        Ok(Self { limit, page })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// `(page - 1) * limit`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1).saturating_mul(i64::from(self.limit))
    }
}

fn parse_positive(raw: Option<&str>, invalid: &str) -> Result<Option<u32>, DomainError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(DomainError::validation(invalid)),
    }
}

/// 記事一覧の取得条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleListQuery {
    pub sort_by:    ArticleSortKey,
    pub order:      SortOrder,
    /// トピックの slug（完全一致）。空文字は未指定として扱う
    pub topic:      Option<String>,
    pub pagination: Pagination,
}

impl ArticleListQuery {
    /// クエリパラメータを検証して取得条件を組み立てる
    ///
    /// DB に触れる前に全項目を検証する。トピックの存在確認はユースケースの責務。
    pub fn parse(
        sort_by: Option<&str>,
        order: Option<&str>,
        topic: Option<&str>,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> Result<Self, DomainError> {
        let sort_by = ArticleSortKey::parse(sort_by)?;
        let order = SortOrder::parse(order)?;
        let pagination = Pagination::parse(limit, page)?;
        let topic = topic.filter(|t| !t.is_empty()).map(str::to_string);

        Ok(Self {
            sort_by,
            order,
            topic,
            pagination,
        })
    }
}

/// ページ単位の取得結果
///
/// `total_count` はページングを無視した総件数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items:       Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items:       self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn validation(msg: &str) -> DomainError {
        DomainError::Validation(msg.to_string())
    }

    #[rstest]
    #[case("article_id", ArticleSortKey::ArticleId)]
    #[case("id", ArticleSortKey::ArticleId)]
    #[case("title", ArticleSortKey::Title)]
    #[case("author", ArticleSortKey::Author)]
    #[case("created_at", ArticleSortKey::CreatedAt)]
    #[case("votes", ArticleSortKey::Votes)]
    #[case("comment_count", ArticleSortKey::CommentCount)]
    fn test_許可リストのsort_byを受け付ける(#[case] raw: &str, #[case] expected: ArticleSortKey) {
        assert_eq!(ArticleSortKey::parse(Some(raw)), Ok(expected));
    }

    #[rstest]
    #[case("not_a_column")]
    #[case("body")]
    #[case("votes; DROP TABLE articles")]
    #[case("VOTES")]
    #[case("")]
    fn test_許可リスト外のsort_byはエラー(#[case] raw: &str) {
        assert_eq!(ArticleSortKey::parse(Some(raw)), Err(validation(INVALID_SORT_BY)));
    }

    #[test]
    fn test_未指定ならcreated_at_descになる() {
        assert_eq!(ArticleSortKey::parse(None), Ok(ArticleSortKey::CreatedAt));
        assert_eq!(SortOrder::parse(None), Ok(SortOrder::Desc));
    }

    #[rstest]
    #[case("asc", SortOrder::Asc)]
    #[case("desc", SortOrder::Desc)]
    fn test_orderを受け付ける(#[case] raw: &str, #[case] expected: SortOrder) {
        assert_eq!(SortOrder::parse(Some(raw)), Ok(expected));
    }

    #[rstest]
    #[case("up")]
    #[case("ASC")]
    #[case("")]
    fn test_不正なorderはエラー(#[case] raw: &str) {
        assert_eq!(SortOrder::parse(Some(raw)), Err(validation(INVALID_ORDER)));
    }

    #[rstest]
    #[case(Some("0"), None, INVALID_LIMIT)]
    #[case(Some("-1"), None, INVALID_LIMIT)]
    #[case(Some("ten"), None, INVALID_LIMIT)]
    #[case(Some("2.5"), None, INVALID_LIMIT)]
    #[case(None, Some("0"), INVALID_PAGE)]
    #[case(None, Some("-2"), INVALID_PAGE)]
    #[case(None, Some("first"), INVALID_PAGE)]
    #[case(Some("0"), Some("0"), INVALID_LIMIT)]
    fn test_不正なページングはエラー(
        #[case] limit: Option<&str>,
        #[case] page: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(Pagination::parse(limit, page), Err(validation(expected)));
    }

    #[rstest]
    #[case(None, None, 10, 1, 0)]
    #[case(Some("5"), None, 5, 1, 0)]
    #[case(Some("5"), Some("3"), 5, 3, 10)]
    #[case(None, Some("2"), 10, 2, 10)]
    fn test_ページングのoffsetを計算する(
        #[case] limit: Option<&str>,
        #[case] page: Option<&str>,
        #[case] expected_limit: u32,
        #[case] expected_page: u32,
        #[case] expected_offset: i64,
    ) {
        let pagination = Pagination::parse(limit, page).unwrap();

        assert_eq!(pagination.limit(), expected_limit);
        assert_eq!(pagination.page(), expected_page);
        assert_eq!(pagination.offset(), expected_offset);
    }

    #[test]
    fn test_検証はsort_by_order_limit_pの順に行う() {
        let all_invalid = ArticleListQuery::parse(Some("x"), Some("x"), None, Some("x"), Some("x"));
        assert_eq!(all_invalid, Err(validation(INVALID_SORT_BY)));

        let order_onward = ArticleListQuery::parse(None, Some("x"), None, Some("x"), Some("x"));
        assert_eq!(order_onward, Err(validation(INVALID_ORDER)));

        let limit_onward = ArticleListQuery::parse(None, None, None, Some("x"), Some("x"));
        assert_eq!(limit_onward, Err(validation(INVALID_LIMIT)));
    }

    #[test]
    fn test_空のtopicは未指定として扱う() {
        let query = ArticleListQuery::parse(None, None, Some(""), None, None).unwrap();

        assert_eq!(query.topic, None);
    }

    #[test]
    fn test_pageのmapは総件数を保持する() {
        let page = Page {
            items:       vec![1, 2, 3],
            total_count: 13,
        };

        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.total_count, 13);
    }
}
