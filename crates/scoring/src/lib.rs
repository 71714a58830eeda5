//! 综合评分：合并技术面与新闻面结果，给出评级、调整后的价格计划与批量排名。

pub mod batch;
pub mod calculator;
pub mod ranking;

pub use batch::CancelFlag;
pub use calculator::ScoreCalculator;
pub use ranking::rank;
