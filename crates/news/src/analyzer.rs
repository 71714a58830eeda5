use crate::keywords::{KeywordTables, best_tier, weighted_matches};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::market::entity::PricePoint;
use screener_core::news::entity::NewsItem;
use screener_core::score::entity::NewsResult;
use std::collections::BTreeMap;
use tracing::debug;

/// 新闻总分范围与中性分
pub const NEWS_MAX: Decimal = dec!(120);
pub const NEWS_NEUTRAL: Decimal = dec!(60);
/// 命中任意负面关键词时的固定分
pub const NEGATIVE_OVERRIDE_SCORE: Decimal = dec!(20);
/// 消退风险固定扣分
pub const FADING_PENALTY: Decimal = dec!(-60);
/// 负面风险下限
pub const NEGATIVE_FLOOR: Decimal = dec!(-120);
const SUSTAINABILITY_MAX: Decimal = dec!(40);
const RAW_SCALE: Decimal = dec!(4);

/// # Summary
/// 新闻面分析器，输出 0–120 的新闻分（无新闻为 60）。
///
/// # Invariants
/// - 关键词表在构造时注入，分析过程只读。
/// - 命中任意负面关键词时，最终分固定为 20，覆盖其余计算。
pub struct NewsAnalyzer {
    tables: KeywordTables,
}

impl Default for NewsAnalyzer {
    fn default() -> Self {
        Self::new(KeywordTables::default())
    }
}

/// 逐条新闻的中间信号
struct ItemSignals {
    freshness: Decimal,
    impact: Decimal,
    credibility: Decimal,
    sustainability: Decimal,
    repeat: bool,
}

impl NewsAnalyzer {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    /// # Summary
    /// 分析单只股票在分析日可见的新闻。
    ///
    /// # Logic
    /// 1. 丢弃发布日期晚于分析日的新闻；为空则返回中性结果。
    /// 2. 新鲜度、影响力、可信度、持续性分别取各条新闻的最大值；持续性按条数加分。
    /// 3. 消退风险：最新日涨幅 > 15%、最新成交量不足前一日一半、或出现重复公告关键词。
    /// 4. 负面风险为所有 (新闻, 关键词) 命中的扣分之和，下限 -120。
    /// 5. `raw = (1..6 之和) × 4`，`score = 60 + raw / 2`，负值截断到 [0, 60]，否则 [60, 120]。
    /// 6. 命中任意负面关键词时分数固定为 20。
    ///
    /// # Arguments
    /// * `items`: 该股票的新闻列表。
    /// * `analysis_date`: 分析日期。
    /// * `daily`: 同一股票的日线，用于消退风险的价格/量能判断。
    pub fn analyze(&self, items: &[NewsItem], analysis_date: NaiveDate, daily: &[PricePoint]) -> NewsResult {
        let visible: Vec<&NewsItem> = items
            .iter()
            .filter(|item| item.age_days(analysis_date) >= 0)
            .collect();
        if visible.is_empty() {
            if !items.is_empty() {
                debug!("{} news items all dated after {}, treated as no news", items.len(), analysis_date);
            }
            return NewsResult::neutral();
        }

        let texts: Vec<String> = visible.iter().map(|item| item.normalized_text()).collect();
        let signals: Vec<ItemSignals> = visible
            .iter()
            .zip(&texts)
            .map(|(item, text)| self.item_signals(item, text, analysis_date))
            .collect();

        let freshness = max_signal(&signals, |s| s.freshness);
        let impact = max_signal(&signals, |s| s.impact);
        let credibility = max_signal(&signals, |s| s.credibility);
        let sustainability =
            (max_signal(&signals, |s| s.sustainability) + count_bonus(visible.len())).min(SUSTAINABILITY_MAX);

        let repeat = signals.iter().any(|s| s.repeat);
        let mut risk_warnings = fading_reasons(daily);
        if repeat {
            risk_warnings.push("repeat announcement".to_string());
        }
        let fading_risk = if risk_warnings.is_empty() {
            Decimal::ZERO
        } else {
            FADING_PENALTY
        };

        let penalty: Decimal = texts
            .iter()
            .flat_map(|text| weighted_matches(&self.tables.negative_penalty, text))
            .map(|(_, w)| w)
            .sum();
        let negative_risk = penalty.clamp(NEGATIVE_FLOOR, Decimal::ZERO);

        let (positive_keywords, negative_keywords, main_factor) = self.extract_keywords(&texts);
        let has_negative = texts.iter().any(|text| self.tables.has_negative(text));

        let raw = (freshness + impact + credibility + sustainability + fading_risk + negative_risk) * RAW_SCALE;
        let mut score = NEWS_NEUTRAL + raw / Decimal::TWO;
        score = if raw < Decimal::ZERO {
            score.clamp(Decimal::ZERO, NEWS_NEUTRAL)
        } else {
            score.clamp(NEWS_NEUTRAL, NEWS_MAX)
        };

        let (status, sustainability_status) = if has_negative {
            risk_warnings.push(format!("negative news: {}", negative_keywords.join(", ")));
            score = NEGATIVE_OVERRIDE_SCORE;
            ("severe negative news".to_string(), "very low (negative)".to_string())
        } else {
            (score_status(score).to_string(), sustainability_label(sustainability).to_string())
        };

        debug!(
            "news: {} items, raw {}, score {}, negative {}, fading {}",
            visible.len(),
            raw,
            score,
            negative_risk,
            fading_risk
        );

        NewsResult {
            freshness,
            impact,
            credibility,
            sustainability,
            fading_risk,
            negative_risk,
            score,
            positive_keywords,
            negative_keywords,
            main_factor,
            status,
            sustainability_status,
            risk_warnings,
            item_count: visible.len(),
        }
    }

    fn item_signals(&self, item: &NewsItem, text: &str, analysis_date: NaiveDate) -> ItemSignals {
        let source = item.source.to_lowercase();
        ItemSignals {
            freshness: freshness_score(item.age_days(analysis_date)),
            impact: best_tier(&self.tables.impact, text, self.tables.impact_default),
            credibility: best_tier(&self.tables.credibility, &source, self.tables.credibility_default),
            sustainability: best_tier(&self.tables.sustainability, text, self.tables.sustainability_default),
            repeat: self
                .tables
                .repeat
                .iter()
                .any(|k| !k.is_empty() && text.contains(k.to_lowercase().as_str())),
        }
    }

    /// # Summary
    /// 提取正面/负面关键词（去重、字典序）与主导因素。
    ///
    /// # Logic
    /// 主导因素为权重绝对值最大的命中关键词，同分时取先出现者；无命中为 "general news"。
    fn extract_keywords(&self, texts: &[String]) -> (Vec<String>, Vec<String>, String) {
        let mut positive: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut negative: BTreeMap<&str, Decimal> = BTreeMap::new();
        for text in texts {
            positive.extend(weighted_matches(&self.tables.positive, text));
            negative.extend(weighted_matches(&self.tables.negative, text));
        }

        let mut main: Option<(&str, Decimal)> = None;
        for (keyword, weight) in negative.iter().chain(positive.iter()) {
            if main.is_none_or(|(_, best)| weight.abs() > best.abs()) {
                main = Some((*keyword, *weight));
            }
        }
        let main_factor = main.map_or_else(|| "general news".to_string(), |(k, _)| k.to_string());

        (
            positive.keys().map(ToString::to_string).collect(),
            negative.keys().map(ToString::to_string).collect(),
            main_factor,
        )
    }
}

/// 新鲜度：1 天内 60，2 天 40，3 天 20，7 天内 8，其余 0
pub fn freshness_score(age_days: i64) -> Decimal {
    match age_days {
        ..=1 => dec!(60),
        2 => dec!(40),
        3 => dec!(20),
        4..=7 => dec!(8),
        _ => Decimal::ZERO,
    }
}

fn max_signal(signals: &[ItemSignals], f: impl Fn(&ItemSignals) -> Decimal) -> Decimal {
    signals.iter().map(f).max().unwrap_or_default()
}

fn count_bonus(count: usize) -> Decimal {
    if count >= 5 {
        dec!(8)
    } else if count >= 3 {
        dec!(4)
    } else {
        Decimal::ZERO
    }
}

/// # Summary
/// 基于日线判断利好是否已被价格消化。
///
/// # Returns
/// 触发的原因列表，为空表示无消退风险。
fn fading_reasons(daily: &[PricePoint]) -> Vec<String> {
    let mut reasons = Vec::new();
    let [.., prev, last] = daily else {
        return reasons;
    };
    if !prev.close.is_zero() && (last.close - prev.close) / prev.close > dec!(0.15) {
        reasons.push("already rallied (> 15% in one day)".to_string());
    }
    if Decimal::from(last.volume) < Decimal::from(prev.volume) * dec!(0.5) {
        reasons.push("volume fading (< 50% of previous day)".to_string());
    }
    reasons
}

fn score_status(score: Decimal) -> &'static str {
    if score >= dec!(100) {
        "very positive"
    } else if score >= dec!(80) {
        "positive"
    } else if score > NEWS_NEUTRAL {
        "slightly positive"
    } else if score == NEWS_NEUTRAL {
        "neutral"
    } else {
        "negative"
    }
}

fn sustainability_label(sustainability: Decimal) -> &'static str {
    if sustainability >= dec!(40) {
        "long-term"
    } else if sustainability >= dec!(28) {
        "mid-term"
    } else if sustainability >= dec!(16) {
        "short-term"
    } else if sustainability > Decimal::ZERO {
        "one-off"
    } else {
        "unclear"
    }
}
