use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::market::entity::Bar;
use screener_core::score::entity::TechnicalGrade;

/// 买入价相对 MA5 的 ATR 折扣系数
pub const BUY_ATR_FACTOR: Decimal = dec!(0.7);
/// 止损比例相对 ATR3/价格 的系数
pub const STOP_ATR_FACTOR: Decimal = dec!(0.8);
/// 止损比例上限 (1.5%)
pub const MAX_STOP_LOSS_RATE: Decimal = dec!(0.015);

/// # Summary
/// Wilder 真实波幅：max(高-低, |高-昨收|, |低-昨收|)。
pub fn true_range<B: Bar>(bar: &B, prev_close: Decimal) -> Decimal {
    let hl = bar.high() - bar.low();
    let hc = (bar.high() - prev_close).abs();
    let lc = (bar.low() - prev_close).abs();
    hl.max(hc).max(lc)
}

/// # Summary
/// 平均真实波幅：最近 `period` 个真实波幅的均值。
///
/// # Returns
/// 需要 `period + 1` 根数据，不足时返回 None。日线与分钟线共用。
pub fn atr<B: Bar>(series: &[B], period: usize) -> Option<Decimal> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }
    let window = &series[series.len() - period - 1..];
    let sum: Decimal = window
        .windows(2)
        .map(|pair| true_range(&pair[1], pair[0].close()))
        .sum();
    Some(sum / Decimal::from(period))
}

/// 原始买入价：MA5 - 0.7 × ATR5
pub fn buy_price(ma5: Decimal, atr5: Decimal) -> Decimal {
    ma5 - BUY_ATR_FACTOR * atr5
}

/// # Summary
/// 止损比例：min(0.8 × ATR3 / 价格, 1.5%)。
///
/// # Invariants
/// - 结果恒在 [0, 0.015]；价格非正时取上限。
pub fn stop_loss_rate(atr3: Decimal, price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return MAX_STOP_LOSS_RATE;
    }
    (STOP_ATR_FACTOR * atr3 / price).clamp(Decimal::ZERO, MAX_STOP_LOSS_RATE)
}

/// 按技术面评级取目标收益率：S 2.0%，A 1.8%，其余 1.5%
pub fn target_rate(grade: TechnicalGrade) -> Decimal {
    match grade {
        TechnicalGrade::S => dec!(0.020),
        TechnicalGrade::A => dec!(0.018),
        _ => dec!(0.015),
    }
}
