//! 纯函数技术指标库。
//!
//! 所有函数接收按时间升序排列的序列，数据不足时返回 `None`，这是数据不足信号而非错误。

pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::{atr, true_range};
pub use bollinger::{BandZone, BollingerBands, bollinger};
pub use macd::{Macd, macd, macd_line};
pub use rsi::{rsi, rsi_score};
pub use sma::sma;
