//! 多周期技术面分析：日线子评分、可选的分钟线子评分与 ATR 价格计划。

pub mod analyzer;
pub mod daily;
pub mod minute;
pub mod plan;

pub use analyzer::TechnicalAnalyzer;
