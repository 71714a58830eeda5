use rust_decimal::Decimal;
use screener_core::market::entity::{Bar, MinutePricePoint, PricePoint};
use screener_core::market::port::TickRounder;
use screener_core::score::entity::{PricePlan, TechnicalGrade};
use screener_indicator::atr::{buy_price, stop_loss_rate, target_rate};
use screener_indicator::{atr, sma};

/// # Summary
/// 由 ATR 与 MA5 推导买入/目标/止损价格计划。
///
/// # Logic
/// 1. 原始买入价 = MA5 - 0.7 × ATR5。
/// 2. 目标价 = 原始买入价 × (1 + 评级目标收益率)。
/// 3. 止损价 = 原始买入价 × (1 - min(0.8 × ATR3 / 收盘价, 1.5%))。
/// 4. 三个价格分别经过最小价位取整。
///
/// # Returns
/// MA5 或 ATR 无法计算、或买入价非正时返回 None，调用方应视为“无可执行计划”。
pub fn build_plan(
    daily: &[PricePoint],
    minutes: Option<&[MinutePricePoint]>,
    grade: TechnicalGrade,
    rounder: &dyn TickRounder,
) -> Option<PricePlan> {
    let close = daily.last()?.close();
    let ma5 = sma(daily, 5)?;
    let atr5 = atr(daily, 5)?;
    let atr3 = atr(daily, 3)?;

    let raw_buy = buy_price(ma5, atr5);
    if raw_buy <= Decimal::ZERO {
        return None;
    }
    let target_rate = target_rate(grade);
    let stop_loss_rate = stop_loss_rate(atr3, close);

    Some(PricePlan {
        buy_price: rounder.round_to_tick(raw_buy),
        target_price: rounder.round_to_tick(raw_buy * (Decimal::ONE + target_rate)),
        stop_loss_price: rounder.round_to_tick(raw_buy * (Decimal::ONE - stop_loss_rate)),
        target_rate,
        stop_loss_rate,
        atr14: atr(daily, 14),
        atr5,
        atr3,
        minute_atr: minutes.and_then(|m| atr(m, 14)),
    })
}
