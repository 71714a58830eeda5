//! 新闻面分析：可注入的关键词表与 0–120 的新闻评分。

pub mod analyzer;
pub mod keywords;

pub use analyzer::NewsAnalyzer;
pub use keywords::{KeywordTables, KeywordTier};
