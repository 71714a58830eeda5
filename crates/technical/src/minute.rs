use crate::daily::{mean_volume, pct_change, trend_pct};
use rust_decimal::Decimal;
use rust_decimal::prelude::Signed;
use rust_decimal_macros::dec;
use screener_core::market::entity::{Bar, MinutePricePoint, PricePoint};
use screener_core::score::entity::MinuteScores;
use screener_indicator::rsi::RSI_PERIOD;
use screener_indicator::{rsi, sma};

/// 分钟线近期趋势回看根数
pub const MINUTE_TREND_LOOKBACK: usize = 30;
/// 分钟量能比较的回看根数
const MINUTE_VOLUME_LOOKBACK: usize = 20;
/// 入场时机观察的最近变动数
const UPTICK_WINDOW: usize = 5;

/// # Summary
/// 分钟线派生指标，用于评分与风险提示。
#[derive(Debug, Clone, Default)]
pub struct MinuteIndicators {
    pub trend_pct: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub volume_ratio: Option<Decimal>,
    pub upticks: usize,
}

impl MinuteIndicators {
    pub fn compute(minutes: &[MinutePricePoint]) -> Self {
        let n = minutes.len();
        let volume_ratio = if n > MINUTE_VOLUME_LOOKBACK {
            mean_volume(&minutes[n - 1 - MINUTE_VOLUME_LOOKBACK..n - 1])
                .filter(|avg| !avg.is_zero())
                .map(|avg| Decimal::from(minutes[n - 1].volume()) / avg)
        } else {
            None
        };
        let upticks = if n > UPTICK_WINDOW {
            (n - UPTICK_WINDOW..n)
                .filter(|&i| minutes[i].close() > minutes[i - 1].close())
                .count()
        } else {
            0
        };
        Self {
            trend_pct: trend_pct(minutes, MINUTE_TREND_LOOKBACK),
            rsi: rsi(minutes, RSI_PERIOD),
            volume_ratio,
            upticks,
        }
    }
}

/// # Summary
/// 分钟趋势评分 (0–8)。
///
/// # Logic
/// 1. 分钟 30 根趋势与日线 5 日趋势同为正：4 分。
/// 2. 分钟均线 5>10>20：4 分；仅 5>20：2 分。
fn trend_score(minutes: &[MinutePricePoint], ind: &MinuteIndicators, daily_trend: Option<Decimal>) -> Decimal {
    let agree = match (ind.trend_pct, daily_trend) {
        (Some(m), Some(d)) if m > Decimal::ZERO && d > Decimal::ZERO => dec!(4),
        _ => Decimal::ZERO,
    };
    let stack = match (sma(minutes, 5), sma(minutes, 10), sma(minutes, 20)) {
        (Some(m5), Some(m10), Some(m20)) if m5 > m10 && m10 > m20 => dec!(4),
        (Some(m5), _, Some(m20)) if m5 > m20 => dec!(2),
        _ => Decimal::ZERO,
    };
    agree + stack
}

/// 分钟动量评分 (0–7)：RSI 区间 + 量能放大
fn momentum_score(ind: &MinuteIndicators) -> Decimal {
    let rsi = match ind.rsi {
        Some(r) if r < dec!(30) => dec!(2),
        Some(r) if r <= dec!(50) => dec!(4),
        Some(r) if r <= dec!(70) => dec!(3),
        _ => Decimal::ZERO,
    };
    let volume = match ind.volume_ratio {
        Some(v) if v >= dec!(2) => dec!(3),
        Some(v) if v >= dec!(1.5) => dec!(2),
        Some(v) if v >= Decimal::ONE => Decimal::ONE,
        _ => Decimal::ZERO,
    };
    rsi + volume
}

/// # Summary
/// 入场时机评分 (0–5)。
///
/// # Logic
/// 1. 最近 5 次分钟变动中上涨次数：>=4 得 3 分，3 次 2 分，2 次 1 分。
/// 2. 当前价距最新日线低点 1% 以内 2 分，2% 以内 1 分。
fn timing_score(minutes: &[MinutePricePoint], ind: &MinuteIndicators, daily_low: Option<Decimal>) -> Decimal {
    let ticks = match ind.upticks {
        0 | 1 => Decimal::ZERO,
        2 => Decimal::ONE,
        3 => dec!(2),
        _ => dec!(3),
    };
    let proximity = match (minutes.last(), daily_low) {
        (Some(last), Some(low)) => match pct_change(low, last.close()).map(|p| p.abs()) {
            Some(p) if p <= Decimal::ONE => dec!(2),
            Some(p) if p <= dec!(2) => Decimal::ONE,
            _ => Decimal::ZERO,
        },
        _ => Decimal::ZERO,
    };
    ticks + proximity
}

/// # Summary
/// 计算分钟级子评分（满分 20：趋势 8，动量 7，时机 5）。
///
/// # Arguments
/// * `minutes`: 已确认可用的分钟线序列。
/// * `daily`: 日线序列，用于趋势一致性与日内低点。
/// * `daily_trend`: 日线 5 日涨跌幅。
pub fn score_minutes(
    minutes: &[MinutePricePoint],
    daily: &[PricePoint],
    daily_trend: Option<Decimal>,
) -> (MinuteScores, MinuteIndicators) {
    let ind = MinuteIndicators::compute(minutes);
    let scores = MinuteScores {
        trend: trend_score(minutes, &ind, daily_trend).min(dec!(8)),
        momentum: momentum_score(&ind).min(dec!(7)),
        timing: timing_score(minutes, &ind, daily.last().map(|b| b.low)).min(dec!(5)),
    };
    (scores, ind)
}

/// # Summary
/// 日线与分钟线近期趋势方向是否一致（符号相同）。
pub fn timeframe_aligned(daily_trend: Option<Decimal>, minute_trend: Option<Decimal>) -> bool {
    match (daily_trend, minute_trend) {
        (Some(d), Some(m)) => d.signum() == m.signum(),
        _ => false,
    }
}
