use crate::sma::sma;
use rust_decimal::Decimal;
use screener_core::market::entity::Bar;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// # Summary
/// 简化版 MACD 的当前值与前一根的值。
///
/// # Invariants
/// - 这里的 “EMA” 实际是最近 N 根收盘价的简单平均，所有下游趋势分都以此为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    pub macd: Decimal,
    pub signal: Option<Decimal>,
    pub prev_macd: Option<Decimal>,
    pub prev_signal: Option<Decimal>,
}

impl Macd {
    /// # Summary
    /// 金叉判定：当前 MACD 在信号线之上，且前一根不在信号线之上。
    pub fn is_golden_cross(&self) -> bool {
        match (self.signal, self.prev_macd, self.prev_signal) {
            (Some(signal), Some(prev_macd), Some(prev_signal)) => {
                self.macd > signal && prev_macd <= prev_signal
            }
            _ => false,
        }
    }

    /// 相比前一根是否上升
    pub fn is_rising(&self) -> bool {
        self.prev_macd.is_some_and(|prev| self.macd > prev)
    }
}

/// # Summary
/// MACD 线：SMA12 - SMA26。
///
/// # Returns
/// 少于 26 根时返回 None。
pub fn macd_line<B: Bar>(series: &[B]) -> Option<Decimal> {
    Some(sma(series, FAST_PERIOD)? - sma(series, SLOW_PERIOD)?)
}

/// 信号线：最近 9 个 MACD 值的简单平均
fn signal_line<B: Bar>(series: &[B]) -> Option<Decimal> {
    if series.len() < SLOW_PERIOD + SIGNAL_PERIOD - 1 {
        return None;
    }
    let mut sum = Decimal::ZERO;
    for end in series.len() - SIGNAL_PERIOD + 1..=series.len() {
        sum += macd_line(&series[..end])?;
    }
    Some(sum / Decimal::from(SIGNAL_PERIOD))
}

/// # Summary
/// 计算 MACD 及金叉判定所需的前值。
///
/// # Logic
/// 1. 当前 MACD 需要 26 根。
/// 2. 信号线需要 34 根，前一根的信号线需要 35 根，不足时对应字段为 None。
pub fn macd<B: Bar>(series: &[B]) -> Option<Macd> {
    let current = macd_line(series)?;
    let prev = series.len().checked_sub(1).map(|n| &series[..n]);
    Some(Macd {
        macd: current,
        signal: signal_line(series),
        prev_macd: prev.and_then(macd_line),
        prev_signal: prev.and_then(signal_line),
    })
}
