use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::market::entity::Bar;

/// RSI 默认回看周期
pub const RSI_PERIOD: usize = 14;

/// # Summary
/// 相对强弱指数（平均涨幅 / 平均跌幅）。
///
/// # Logic
/// 1. 取最近 `period + 1` 根收盘价，累计逐日涨幅与跌幅。
/// 2. 跌幅为 0 时返回 100；涨跌幅同时为 0（完全横盘）时返回 50。
/// 3. 否则返回 `100 - 100 / (1 + 平均涨幅 / 平均跌幅)`。
///
/// # Returns
/// 数据少于 `period + 1` 根时返回 None；结果恒在 [0, 100]。
pub fn rsi<B: Bar>(series: &[B], period: usize) -> Option<Decimal> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }
    let window = &series[series.len() - period - 1..];
    let (gains, losses) = window
        .windows(2)
        .fold((Decimal::ZERO, Decimal::ZERO), |(g, l), pair| {
            let change = pair[1].close() - pair[0].close();
            if change > Decimal::ZERO {
                (g + change, l)
            } else {
                (g, l - change)
            }
        });

    if losses.is_zero() {
        return Some(if gains.is_zero() { dec!(50) } else { Decimal::ONE_HUNDRED });
    }
    let n = Decimal::from(period);
    let rs = (gains / n) / (losses / n);
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}

/// # Summary
/// 将 RSI 映射为 0–10 分。
///
/// # Logic
/// 30–40 的回调买入区最高 10 分；超卖区 (<30) 8 分；向上逐级递减，超买 (>70) 为 0。
pub fn rsi_score(rsi: Decimal) -> Decimal {
    if rsi < dec!(30) {
        dec!(8)
    } else if rsi <= dec!(40) {
        dec!(10)
    } else if rsi <= dec!(50) {
        dec!(8)
    } else if rsi <= dec!(60) {
        dec!(6)
    } else if rsi <= dec!(70) {
        dec!(3)
    } else {
        Decimal::ZERO
    }
}
