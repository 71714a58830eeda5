use crate::news::entity::NewsItem;
use crate::news::error::NewsError;
use async_trait::async_trait;

/// # Summary
/// 新闻数据源接口（HTTP/RSS 抓取器等外部协作方）。
///
/// # Invariants
/// - 空列表是合法输入，代表“无新闻”，引擎按中性处理。
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// # Summary
    /// 获取指定股票的近期新闻。
    ///
    /// # Arguments
    /// * `code`: 股票代码。
    ///
    /// # Returns
    /// 成功返回新闻列表，失败返回 NewsError。
    async fn news(&self, code: &str) -> Result<Vec<NewsItem>, NewsError>;
}
