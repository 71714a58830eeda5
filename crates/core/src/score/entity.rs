use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 被排除结果的固定优先级
pub const EXCLUDED_PRIORITY: u32 = 999;

/// # Summary
/// 技术面单独评级（0–80 分制）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TechnicalGrade {
    S,
    A,
    B,
    C,
    D,
}

impl TechnicalGrade {
    /// # Logic
    /// S >= 70，A >= 60，B >= 50，C >= 40，其余为 D。
    pub fn from_score(score: Decimal) -> Self {
        if score >= Decimal::from(70) {
            TechnicalGrade::S
        } else if score >= Decimal::from(60) {
            TechnicalGrade::A
        } else if score >= Decimal::from(50) {
            TechnicalGrade::B
        } else if score >= Decimal::from(40) {
            TechnicalGrade::C
        } else {
            TechnicalGrade::D
        }
    }
}

/// # Summary
/// 可执行的价格计划。
///
/// # Invariants
/// - 三个价格均已经过最小价位取整。
/// - `stop_loss_rate` 不超过 1.5%。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePlan {
    pub buy_price: Decimal,
    pub target_price: Decimal,
    pub stop_loss_price: Decimal,
    // 目标收益率（小数，0.02 即 2%）
    pub target_rate: Decimal,
    // 止损比例（小数）
    pub stop_loss_rate: Decimal,
    pub atr14: Option<Decimal>,
    pub atr5: Decimal,
    pub atr3: Decimal,
    // 分钟级 ATR，仅在分钟线可用时存在
    pub minute_atr: Option<Decimal>,
}

/// # Summary
/// 分析时点的原始指标快照，便于解释评分。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: Option<Decimal>,
    pub ma5: Option<Decimal>,
    pub ma10: Option<Decimal>,
    pub ma20: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub bollinger_position: Option<Decimal>,
    // 最新成交量 / 前 10 根平均成交量
    pub volume_ratio: Option<Decimal>,
    // 5 日涨跌幅（百分比）
    pub daily_trend_pct: Option<Decimal>,
    // 分钟线 30 根涨跌幅（百分比）
    pub minute_trend_pct: Option<Decimal>,
    pub minute_rsi: Option<Decimal>,
}

/// # Summary
/// 分钟级子评分（总计最多 20 分）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteScores {
    // 分钟趋势 (<= 8)
    pub trend: Decimal,
    // 分钟动量 (<= 7)
    pub momentum: Decimal,
    // 入场时机 (<= 5)
    pub timing: Decimal,
}

impl MinuteScores {
    pub fn total(&self) -> Decimal {
        self.trend + self.momentum + self.timing
    }
}

/// # Summary
/// 技术面分析结果。
///
/// # Invariants
/// - 每次分析新建，返回后不可变。
/// - `total` 位于 [0, 80]。
/// - 数据不足时 `total` 为 0，`plan` 为 None。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalResult {
    pub trend: Decimal,
    pub momentum: Decimal,
    pub pattern: Decimal,
    pub support_resistance: Decimal,
    pub supply_demand: Decimal,
    // 趋势分项（未缩放）：均线排列 (<= 12)
    pub ma_alignment: Decimal,
    // 趋势分项（未缩放）：MACD (<= 8)
    pub macd: Decimal,
    // 趋势分项（未缩放）：7 日均线回踩 (<= 5)
    pub pullback: Decimal,
    pub minute: Option<MinuteScores>,
    pub total: Decimal,
    pub grade: TechnicalGrade,
    pub indicators: IndicatorSnapshot,
    pub status: String,
    pub trend_status: String,
    pub momentum_status: String,
    // 日线与分钟线近期方向是否一致（仅作展示）
    pub timeframe_aligned: bool,
    pub risk_warnings: Vec<String>,
    pub plan: Option<PricePlan>,
}

impl TechnicalResult {
    /// # Summary
    /// 构造数据不足时的零分结果。
    pub fn insufficient() -> Self {
        Self {
            trend: Decimal::ZERO,
            momentum: Decimal::ZERO,
            pattern: Decimal::ZERO,
            support_resistance: Decimal::ZERO,
            supply_demand: Decimal::ZERO,
            ma_alignment: Decimal::ZERO,
            macd: Decimal::ZERO,
            pullback: Decimal::ZERO,
            minute: None,
            total: Decimal::ZERO,
            grade: TechnicalGrade::D,
            indicators: IndicatorSnapshot::default(),
            status: "insufficient data".to_string(),
            trend_status: "unknown".to_string(),
            momentum_status: "unknown".to_string(),
            timeframe_aligned: false,
            risk_warnings: Vec::new(),
            plan: None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.status == "insufficient data"
    }
}

/// # Summary
/// 新闻面分析结果。
///
/// # Invariants
/// - `score` 位于 [0, 120]，无新闻时恰为 60。
/// - 命中任意负面关键词时 `score` 恒为 20。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResult {
    pub freshness: Decimal,
    pub impact: Decimal,
    pub credibility: Decimal,
    pub sustainability: Decimal,
    // 0 或 -60
    pub fading_risk: Decimal,
    // [-120, 0]
    pub negative_risk: Decimal,
    pub score: Decimal,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub main_factor: String,
    pub status: String,
    pub sustainability_status: String,
    pub risk_warnings: Vec<String>,
    pub item_count: usize,
}

impl NewsResult {
    /// # Summary
    /// 构造无新闻时的中性结果 (60 分)。
    pub fn neutral() -> Self {
        Self {
            freshness: Decimal::ZERO,
            impact: Decimal::ZERO,
            credibility: Decimal::ZERO,
            sustainability: Decimal::ZERO,
            fading_risk: Decimal::ZERO,
            negative_risk: Decimal::ZERO,
            score: Decimal::from(60),
            positive_keywords: Vec::new(),
            negative_keywords: Vec::new(),
            main_factor: "no news".to_string(),
            status: "neutral (no news)".to_string(),
            sustainability_status: "none".to_string(),
            risk_warnings: Vec::new(),
            item_count: 0,
        }
    }
}

/// # Summary
/// 综合评级，S 最优，EXCLUDED 表示不参与交易。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "S")]
    S,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "WATCH")]
    Watch,
    #[serde(rename = "EXCLUDED")]
    Excluded,
}

impl Grade {
    /// 评级对应的初始优先级
    pub fn base_priority(self) -> u32 {
        match self {
            Grade::S => 1,
            Grade::A => 2,
            Grade::B => 3,
            Grade::Watch => 4,
            Grade::Excluded => EXCLUDED_PRIORITY,
        }
    }

    /// 下调一档 (S -> A -> B -> WATCH)，WATCH 与 EXCLUDED 不变
    pub fn demote(self) -> Self {
        match self {
            Grade::S => Grade::A,
            Grade::A => Grade::B,
            Grade::B | Grade::Watch => Grade::Watch,
            Grade::Excluded => Grade::Excluded,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::S => write!(f, "S"),
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::Watch => write!(f, "WATCH"),
            Grade::Excluded => write!(f, "EXCLUDED"),
        }
    }
}

/// # Summary
/// 单只股票的综合评分结果。
///
/// # Invariants
/// - `grade == Excluded` 当且仅当触发了负面新闻或评分下限条件。
/// - `has_negative_news` 为真时 `grade` 必为 Excluded，`priority` 必为 999。
/// - `total_score` 位于 [30, 100]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub code: String,
    pub name: String,
    pub analysis_date: NaiveDate,
    pub technical_score: Decimal,
    pub news_score: Decimal,
    // 惩罚与加成前的原始合计
    pub raw_total: Decimal,
    pub total_score: Decimal,
    pub grade: Grade,
    pub priority: u32,
    pub has_negative_news: bool,
    pub has_fading_risk: bool,
    pub plan: Option<PricePlan>,
    // (target - buy) / buy * 100，保留两位小数
    pub expected_return: Option<Decimal>,
    pub reasons: Vec<String>,
    pub technical: TechnicalResult,
    pub news: NewsResult,
}

impl CompositeResult {
    pub fn is_excluded(&self) -> bool {
        self.grade == Grade::Excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_technical_grade_boundaries() {
        assert_eq!(TechnicalGrade::from_score(dec!(70)), TechnicalGrade::S);
        assert_eq!(TechnicalGrade::from_score(dec!(69.99)), TechnicalGrade::A);
        assert_eq!(TechnicalGrade::from_score(dec!(50)), TechnicalGrade::B);
        assert_eq!(TechnicalGrade::from_score(dec!(40)), TechnicalGrade::C);
        assert_eq!(TechnicalGrade::from_score(dec!(0)), TechnicalGrade::D);
    }

    #[test]
    fn test_grade_demotion_chain() {
        assert_eq!(Grade::S.demote(), Grade::A);
        assert_eq!(Grade::A.demote(), Grade::B);
        assert_eq!(Grade::B.demote(), Grade::Watch);
        assert_eq!(Grade::Watch.demote(), Grade::Watch);
        assert_eq!(Grade::Excluded.demote(), Grade::Excluded);
        assert_eq!(Grade::Excluded.base_priority(), EXCLUDED_PRIORITY);
    }
}
