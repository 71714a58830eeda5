use crate::daily::{DailyIndicators, DailyScores, score_daily};
use crate::minute::{MinuteIndicators, score_minutes, timeframe_aligned};
use crate::plan::build_plan;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::config::EngineConfig;
use screener_core::market::entity::{MinutePricePoint, Stock};
use screener_core::market::port::TickRounder;
use screener_core::score::entity::{IndicatorSnapshot, TechnicalGrade, TechnicalResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// 技术面总分上限
pub const TECHNICAL_MAX: Decimal = dec!(80);
/// 有分钟线时日线部分的缩放系数 (60 / 80)
const DAILY_SCALE_WITH_MINUTES: Decimal = dec!(0.75);

/// # Summary
/// 技术面分析器，输出 0–80 的技术分与价格计划。
///
/// # Invariants
/// - 纯计算，不持有可变状态，可在多线程间共享。
/// - 日线不足 `min_daily_bars` 根时返回零分的 “insufficient data” 结果。
pub struct TechnicalAnalyzer {
    config: EngineConfig,
    rounder: Arc<dyn TickRounder>,
}

impl TechnicalAnalyzer {
    /// # Summary
    /// 创建技术面分析器。
    ///
    /// # Arguments
    /// * `config`: 引擎配置（最少根数等）。
    /// * `rounder`: 价格取整协作方，计划中的所有价格都经过它。
    pub fn new(config: EngineConfig, rounder: Arc<dyn TickRounder>) -> Self {
        Self { config, rounder }
    }

    /// # Summary
    /// 对单只股票执行技术面分析。
    ///
    /// # Logic
    /// 1. 校验日线数量与价格不变量，不满足则返回零分结果。
    /// 2. 计算日线指标与五项日线子评分。
    /// 3. 分钟线不少于 `min_minute_bars` 根且价格合法时视为可用：日线部分缩放到 60 分，分钟部分最多 20 分。
    /// 4. 汇总总分、评级、价格计划、风险提示与状态描述。
    ///
    /// # Arguments
    /// * `stock`: 候选证券（只读）。
    /// * `minutes`: 可选的分钟线序列。
    ///
    /// # Returns
    /// 新建的不可变分析结果。
    pub fn analyze(&self, stock: &Stock, minutes: Option<&[MinutePricePoint]>) -> TechnicalResult {
        let daily = stock.daily_prices.as_slice();
        if daily.len() < self.config.min_daily_bars {
            debug!(
                "{}: {} daily bars, {} required, technical score is zero",
                stock.code,
                daily.len(),
                self.config.min_daily_bars
            );
            return TechnicalResult::insufficient();
        }
        if let Some(bad) = daily.iter().position(|p| !p.is_valid()) {
            warn!("{}: daily bar #{} violates price invariants, skipping technical analysis", stock.code, bad);
            return TechnicalResult::insufficient();
        }
        let Some(ind) = DailyIndicators::compute(daily) else {
            return TechnicalResult::insufficient();
        };
        let daily_scores = score_daily(daily, &ind);

        let usable = minutes.filter(|m| self.minutes_usable(&stock.code, m));
        let minute_part = usable.map(|m| score_minutes(m, daily, ind.trend_pct));
        let scale = if minute_part.is_some() {
            DAILY_SCALE_WITH_MINUTES
        } else {
            Decimal::ONE
        };

        let minute_total = minute_part
            .as_ref()
            .map(|(s, _)| s.total())
            .unwrap_or_default();
        let total = (daily_scores.total() * scale + minute_total).clamp(Decimal::ZERO, TECHNICAL_MAX);
        let grade = TechnicalGrade::from_score(total);
        let plan = build_plan(daily, usable, grade, self.rounder.as_ref());

        let minute_ind = minute_part.as_ref().map(|(_, i)| i);
        let aligned = timeframe_aligned(ind.trend_pct, minute_ind.and_then(|i| i.trend_pct));
        let risk_warnings = risk_warnings(&ind, minute_ind, total);

        debug!(
            "{}: technical {} ({:?}), minute data: {}, plan: {}",
            stock.code,
            total.round_dp(2),
            grade,
            minute_part.is_some(),
            plan.is_some()
        );

        TechnicalResult {
            trend: daily_scores.trend * scale,
            momentum: daily_scores.momentum * scale,
            pattern: daily_scores.pattern * scale,
            support_resistance: daily_scores.support_resistance * scale,
            supply_demand: daily_scores.supply_demand * scale,
            ma_alignment: daily_scores.ma_alignment,
            macd: daily_scores.macd,
            pullback: daily_scores.pullback,
            indicators: snapshot(&ind, minute_ind),
            minute: minute_part.map(|(s, _)| s),
            total,
            grade,
            status: overall_status(grade).to_string(),
            trend_status: trend_status(&ind, &daily_scores).to_string(),
            momentum_status: momentum_status(&ind),
            timeframe_aligned: aligned,
            risk_warnings,
            plan,
        }
    }
}

impl TechnicalAnalyzer {
    /// 分钟线数量足够且每根都满足价格不变量时才参与评分
    fn minutes_usable(&self, code: &str, minutes: &[MinutePricePoint]) -> bool {
        if minutes.len() < self.config.min_minute_bars {
            debug!("{}: minute series too short, using daily only", code);
            return false;
        }
        if let Some(bad) = minutes.iter().position(|m| !m.bar.is_valid()) {
            warn!("{}: minute bar #{} violates price invariants, using daily only", code, bad);
            return false;
        }
        true
    }
}

fn snapshot(ind: &DailyIndicators, minute: Option<&MinuteIndicators>) -> IndicatorSnapshot {
    IndicatorSnapshot {
        close: Some(ind.close),
        ma5: ind.ma5,
        ma10: ind.ma10,
        ma20: ind.ma20,
        rsi: ind.rsi,
        macd: ind.macd.map(|m| m.macd),
        macd_signal: ind.macd.and_then(|m| m.signal),
        bollinger_position: ind.bands.map(|b| b.position),
        volume_ratio: ind.volume_ratio,
        daily_trend_pct: ind.trend_pct,
        minute_trend_pct: minute.and_then(|m| m.trend_pct),
        minute_rsi: minute.and_then(|m| m.rsi),
    }
}

/// # Summary
/// 汇总风险提示（可同时出现多条）。
///
/// # Logic
/// 1. 日线 RSI > 80、5 日涨幅 > 15% / > 20%、放量不足的上涨。
/// 2. 分钟 RSI > 80、30 分钟涨幅 > 10%。
/// 3. 总分 < 40 但 5 日涨幅仍 > 5%：评分与原始趋势不一致。
fn risk_warnings(ind: &DailyIndicators, minute: Option<&MinuteIndicators>, total: Decimal) -> Vec<String> {
    let mut warnings = Vec::new();
    if ind.rsi.is_some_and(|r| r > dec!(80)) {
        warnings.push("overbought (RSI > 80)".to_string());
    }
    let trend = ind.trend_pct.unwrap_or_default();
    if trend > dec!(15) {
        warnings.push("post-rally pullback risk (5-day > 15%)".to_string());
    }
    if trend > dec!(20) {
        warnings.push("excessive rally (5-day > 20%)".to_string());
    }
    if trend > dec!(5) && ind.volume_ratio.is_some_and(|v| v < Decimal::ONE) {
        warnings.push("price up without volume confirmation".to_string());
    }
    if let Some(m) = minute {
        if m.rsi.is_some_and(|r| r > dec!(80)) {
            warnings.push("minute overbought (RSI > 80)".to_string());
        }
        if m.trend_pct.is_some_and(|t| t > dec!(10)) {
            warnings.push("minute surge (> 10% in 30 minutes)".to_string());
        }
    }
    if total < dec!(40) && trend > dec!(5) {
        warnings.push("technical weakness mismatch (low score, rising trend)".to_string());
    }
    warnings
}

fn overall_status(grade: TechnicalGrade) -> &'static str {
    match grade {
        TechnicalGrade::S | TechnicalGrade::A => "strong",
        TechnicalGrade::B => "favorable",
        TechnicalGrade::C => "neutral",
        TechnicalGrade::D => "weak",
    }
}

fn trend_status(ind: &DailyIndicators, scores: &DailyScores) -> &'static str {
    if scores.ma_alignment == dec!(12) {
        return "strong uptrend (MA5 > MA10 > MA20)";
    }
    if !scores.ma_alignment.is_zero() {
        return "partial uptrend";
    }
    match (ind.ma5, ind.ma10, ind.ma20) {
        (Some(a), Some(b), Some(c)) if a < b && b < c => "downtrend",
        _ => "sideways",
    }
}

fn momentum_status(ind: &DailyIndicators) -> String {
    let rsi = match ind.rsi {
        Some(r) if r > dec!(70) => "overbought",
        Some(r) if r < dec!(30) => "oversold",
        Some(r) if r <= dec!(40) => "pullback zone",
        Some(_) => "neutral",
        None => "unknown",
    };
    match ind.volume_ratio {
        Some(v) if v >= dec!(2) => format!("{rsi}, volume surge"),
        Some(v) if v < dec!(0.5) => format!("{rsi}, thin volume"),
        _ => rsi.to_string(),
    }
}
