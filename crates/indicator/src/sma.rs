use rust_decimal::Decimal;
use screener_core::market::entity::Bar;

/// # Summary
/// 简单移动平均：最近 `period` 根收盘价的算术平均。
///
/// # Returns
/// 序列短于 `period` 或 `period` 为 0 时返回 None。
pub fn sma<B: Bar>(series: &[B], period: usize) -> Option<Decimal> {
    if period == 0 || series.len() < period {
        return None;
    }
    let sum: Decimal = series[series.len() - period..].iter().map(Bar::close).sum();
    Some(sum / Decimal::from(period))
}
