use thiserror::Error;

/// # Summary
/// 行情数据域错误枚举，描述价格数据源协作方的失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 引擎在调用点捕获这些错误并降级处理，不向分析入口外传播。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误，包含底层客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求超时
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
    // 请求的数据未找到或内容为空
    #[error("Data not found")]
    NotFound,
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
