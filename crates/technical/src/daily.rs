use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::market::entity::Bar;
use screener_indicator::bollinger::{BOLLINGER_K, BOLLINGER_PERIOD};
use screener_indicator::rsi::RSI_PERIOD;
use screener_indicator::{BollingerBands, Macd, bollinger, macd, rsi, rsi_score, sma};

/// 日线子评分满分
pub const TREND_MAX: Decimal = dec!(25);
pub const MOMENTUM_MAX: Decimal = dec!(25);
pub const PATTERN_MAX: Decimal = dec!(15);
pub const SUPPORT_RESISTANCE_MAX: Decimal = dec!(10);
pub const SUPPLY_DEMAND_MAX: Decimal = dec!(5);

/// 近期趋势回看根数（日线）
pub const DAILY_TREND_LOOKBACK: usize = 5;
/// 成交量放大比较的回看根数
const VOLUME_LOOKBACK: usize = 10;
/// 斐波那契回撤的回看根数
const FIB_LOOKBACK: usize = 20;

/// # Summary
/// 未缩放的日线子评分（合计满分 80）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyScores {
    pub ma_alignment: Decimal,
    pub macd: Decimal,
    pub pullback: Decimal,
    pub trend: Decimal,
    pub rsi: Decimal,
    pub volume_surge: Decimal,
    pub band_momentum: Decimal,
    pub momentum: Decimal,
    pub pattern: Decimal,
    pub support_resistance: Decimal,
    pub supply_demand: Decimal,
}

impl DailyScores {
    pub fn total(&self) -> Decimal {
        self.trend + self.momentum + self.pattern + self.support_resistance + self.supply_demand
    }
}

/// # Summary
/// 一次日线分析所需的原始指标。
#[derive(Debug, Clone)]
pub struct DailyIndicators {
    pub close: Decimal,
    pub ma5: Option<Decimal>,
    pub ma7: Option<Decimal>,
    pub ma10: Option<Decimal>,
    pub ma20: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: Option<Macd>,
    pub bands: Option<BollingerBands>,
    pub prev_bands: Option<BollingerBands>,
    pub volume_ratio: Option<Decimal>,
    pub trend_pct: Option<Decimal>,
}

impl DailyIndicators {
    /// # Summary
    /// 从日线序列计算全部指标。
    ///
    /// # Returns
    /// 空序列返回 None。
    pub fn compute<B: Bar>(series: &[B]) -> Option<Self> {
        let last = series.last()?;
        let prev = &series[..series.len() - 1];
        Some(Self {
            close: last.close(),
            ma5: sma(series, 5),
            ma7: sma(series, 7),
            ma10: sma(series, 10),
            ma20: sma(series, 20),
            rsi: rsi(series, RSI_PERIOD),
            macd: macd(series),
            bands: bollinger(series, BOLLINGER_PERIOD, BOLLINGER_K),
            prev_bands: bollinger(prev, BOLLINGER_PERIOD, BOLLINGER_K),
            volume_ratio: volume_ratio(series, VOLUME_LOOKBACK),
            trend_pct: trend_pct(series, DAILY_TREND_LOOKBACK),
        })
    }
}

/// # Summary
/// 百分比涨跌幅 (to - from) / from × 100。
pub fn pct_change(from: Decimal, to: Decimal) -> Option<Decimal> {
    if from.is_zero() {
        return None;
    }
    Some((to - from) / from * Decimal::ONE_HUNDRED)
}

/// 最新收盘价相对 `lookback` 根之前收盘价的涨跌幅（百分比）
pub fn trend_pct<B: Bar>(series: &[B], lookback: usize) -> Option<Decimal> {
    let n = series.len();
    if lookback == 0 || n < lookback + 1 {
        return None;
    }
    pct_change(series[n - 1 - lookback].close(), series[n - 1].close())
}

/// 一组 K 线的平均成交量
pub fn mean_volume<B: Bar>(bars: &[B]) -> Option<Decimal> {
    if bars.is_empty() {
        return None;
    }
    let sum: Decimal = bars.iter().map(|b| Decimal::from(b.volume())).sum();
    Some(sum / Decimal::from(bars.len()))
}

/// # Summary
/// 最新成交量 / 之前 `lookback` 根的平均成交量。
///
/// # Returns
/// 数据不足或历史均量为 0 时返回 None。
pub fn volume_ratio<B: Bar>(series: &[B], lookback: usize) -> Option<Decimal> {
    let n = series.len();
    if lookback == 0 || n < lookback + 1 {
        return None;
    }
    let avg = mean_volume(&series[n - 1 - lookback..n - 1])?;
    if avg.is_zero() {
        return None;
    }
    Some(Decimal::from(series[n - 1].volume()) / avg)
}

/// 均线排列：5>10>20 为 12 分，仅 5>10 为 7 分，仅 10>20 为 4 分
pub fn ma_alignment_score(ma5: Option<Decimal>, ma10: Option<Decimal>, ma20: Option<Decimal>) -> Decimal {
    let (Some(ma5), Some(ma10), Some(ma20)) = (ma5, ma10, ma20) else {
        return Decimal::ZERO;
    };
    if ma5 > ma10 && ma10 > ma20 {
        dec!(12)
    } else if ma5 > ma10 {
        dec!(7)
    } else if ma10 > ma20 {
        dec!(4)
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// MACD 评分 (0–8)。
///
/// # Logic
/// 金叉 8 > 正值且上升 6 > 正值走平 4 > 负值但上升 2 > 负值 0。
pub fn macd_score(m: Option<&Macd>) -> Decimal {
    let Some(m) = m else {
        return Decimal::ZERO;
    };
    if m.is_golden_cross() {
        dec!(8)
    } else if m.macd > Decimal::ZERO && m.is_rising() {
        dec!(6)
    } else if m.macd > Decimal::ZERO {
        dec!(4)
    } else if m.is_rising() {
        dec!(2)
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// 7 日均线回踩评分 (0–5)。
///
/// # Logic
/// 1. 收盘价距 MA7 不超过 2% 得 3 分，不超过 5% 得 2 分。
/// 2. 之前三个交易日中出现过下跌、且最新一日上涨（回调后反弹）加 2 分。
pub fn pullback_score<B: Bar>(series: &[B], ma7: Option<Decimal>) -> Decimal {
    let Some(ma7) = ma7.filter(|m| !m.is_zero()) else {
        return Decimal::ZERO;
    };
    let Some(close) = series.last().map(Bar::close) else {
        return Decimal::ZERO;
    };
    let distance = ((close - ma7) / ma7).abs();
    let mut score = if distance <= dec!(0.02) {
        dec!(3)
    } else if distance <= dec!(0.05) {
        dec!(2)
    } else {
        Decimal::ZERO
    };

    let n = series.len();
    if n >= 5 {
        let change = |i: usize| series[i].close() - series[i - 1].close();
        let latest_up = change(n - 1) > Decimal::ZERO;
        let corrected = (n - 4..n - 1).any(|i| change(i) < Decimal::ZERO);
        if latest_up && corrected {
            score += dec!(2);
        }
    }
    score.min(dec!(5))
}

/// 成交量放大评分 (0–10)
pub fn volume_surge_score(ratio: Option<Decimal>) -> Decimal {
    let Some(r) = ratio else {
        return Decimal::ZERO;
    };
    if r >= dec!(3) {
        dec!(10)
    } else if r >= dec!(2.5) {
        dec!(8)
    } else if r >= dec!(2) {
        dec!(7)
    } else if r >= dec!(1.5) {
        dec!(5)
    } else if r >= dec!(1.2) {
        dec!(3)
    } else if r >= Decimal::ONE {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// 布林带中轨突破动量评分 (0–5)。
///
/// # Logic
/// 1. 本根站上中轨且前一根未站上：新突破 5 分。
/// 2. 已贴近上轨 (position >= 0.8)：1 分。
/// 3. 位于中轨之上：3 分。
pub fn band_momentum_score(
    close: Decimal,
    prev_close: Option<Decimal>,
    bands: Option<&BollingerBands>,
    prev_bands: Option<&BollingerBands>,
) -> Decimal {
    let Some(bands) = bands else {
        return Decimal::ZERO;
    };
    let above = close > bands.middle;
    let was_above = match (prev_close, prev_bands) {
        (Some(pc), Some(pb)) => pc > pb.middle,
        _ => true,
    };
    if above && !was_above {
        dec!(5)
    } else if bands.position >= dec!(0.8) {
        Decimal::ONE
    } else if above {
        dec!(3)
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// K 线形态评分 (0–15)：实体强度 + 连涨配合量能 + 跳空。
pub fn pattern_score<B: Bar>(series: &[B]) -> Decimal {
    let n = series.len();
    let Some(last) = series.last() else {
        return Decimal::ZERO;
    };

    // 实体强度 (<= 5)
    let range = last.high() - last.low();
    let body = if range.is_zero() || last.close() <= last.open() {
        Decimal::ZERO
    } else {
        let ratio = (last.close() - last.open()) / range;
        if ratio >= dec!(0.7) {
            dec!(5)
        } else if ratio >= dec!(0.5) {
            dec!(3)
        } else {
            Decimal::ONE
        }
    };

    // 连续上涨天数 + 量能确认 (<= 6)
    let rise_days = (1..n)
        .rev()
        .take_while(|&i| series[i].close() > series[i - 1].close())
        .count();
    let mut rise = match rise_days {
        0 => Decimal::ZERO,
        1 => Decimal::ONE,
        2 => dec!(3),
        _ => dec!(4),
    };
    if rise_days >= 1 && last.volume() > series[n - 2].volume() {
        rise += dec!(2);
    }
    let rise = rise.min(dec!(6));

    // 跳空 (<= 4)
    let gap = if n >= 2 {
        let prev_high = series[n - 2].high();
        if last.low() > prev_high {
            dec!(4)
        } else if last.open() > prev_high {
            dec!(2)
        } else {
            Decimal::ZERO
        }
    } else {
        Decimal::ZERO
    };

    (body + rise + gap).min(PATTERN_MAX)
}

/// # Summary
/// 斐波那契 50% 回撤位接近度评分 (0–4)。
pub fn fibonacci_score<B: Bar>(series: &[B]) -> Decimal {
    let n = series.len();
    if n < FIB_LOOKBACK {
        return Decimal::ZERO;
    }
    let window = &series[n - FIB_LOOKBACK..];
    let (Some(high), Some(low)) = (
        window.iter().map(Bar::high).max(),
        window.iter().map(Bar::low).min(),
    ) else {
        return Decimal::ZERO;
    };
    let close = window[FIB_LOOKBACK - 1].close();
    if close.is_zero() {
        return Decimal::ZERO;
    }
    let fib50 = high - (high - low) / Decimal::TWO;
    let distance = ((close - fib50) / close).abs();
    if distance <= dec!(0.02) {
        dec!(4)
    } else if distance <= dec!(0.05) {
        dec!(2)
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// 供需评分 (0–5)：最近 3 根平均成交量相对之前 10 根平均成交量。
pub fn supply_demand_score<B: Bar>(series: &[B]) -> Decimal {
    let n = series.len();
    if n < 13 {
        return Decimal::ZERO;
    }
    let (Some(recent), Some(prior)) = (mean_volume(&series[n - 3..]), mean_volume(&series[n - 13..n - 3])) else {
        return Decimal::ZERO;
    };
    if prior.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = recent / prior;
    if ratio >= dec!(2) {
        dec!(5)
    } else if ratio >= dec!(1.5) {
        dec!(4)
    } else if ratio >= dec!(1.2) {
        dec!(3)
    } else if ratio >= Decimal::ONE {
        dec!(2)
    } else if ratio >= dec!(0.8) {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// 计算全部日线子评分（未缩放）。
///
/// # Logic
/// 1. 趋势 = 均线排列 + MACD + 回踩，封顶 25。
/// 2. 动量 = RSI + 量能放大 + 布林中轨动量，封顶 25。
/// 3. 形态、支撑阻力、供需分别封顶 15 / 10 / 5。
pub fn score_daily<B: Bar>(series: &[B], ind: &DailyIndicators) -> DailyScores {
    let ma_alignment = ma_alignment_score(ind.ma5, ind.ma10, ind.ma20);
    let macd = macd_score(ind.macd.as_ref());
    let pullback = pullback_score(series, ind.ma7);
    let trend = (ma_alignment + macd + pullback).min(TREND_MAX);

    let rsi = ind.rsi.map(rsi_score).unwrap_or_default();
    let volume_surge = volume_surge_score(ind.volume_ratio);
    let prev_close = series.len().checked_sub(2).map(|i| series[i].close());
    let band_momentum =
        band_momentum_score(ind.close, prev_close, ind.bands.as_ref(), ind.prev_bands.as_ref());
    let momentum = (rsi + volume_surge + band_momentum).min(MOMENTUM_MAX);

    let band_position = ind.bands.map(|b| b.position_score()).unwrap_or_default();
    let support_resistance = (band_position + fibonacci_score(series)).min(SUPPORT_RESISTANCE_MAX);

    DailyScores {
        ma_alignment,
        macd,
        pullback,
        trend,
        rsi,
        volume_surge,
        band_momentum,
        momentum,
        pattern: pattern_score(series),
        support_resistance,
        supply_demand: supply_demand_score(series).min(SUPPLY_DEMAND_MAX),
    }
}
