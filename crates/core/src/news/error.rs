use thiserror::Error;

/// # Summary
/// 新闻数据域错误枚举，描述新闻抓取协作方的失败。
#[derive(Error, Debug)]
pub enum NewsError {
    // 网络层错误
    #[error("Network error: {0}")]
    Network(String),
    // 响应解析错误 (RSS/HTML/JSON)
    #[error("Parse error: {0}")]
    Parse(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
