use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use screener_core::config::{AppConfig, BatchConfig, EngineConfig};
use screener_core::market::entity::{MinutePricePoint, Stock};
use screener_core::market::port::{MinuteDataProvider, TickRounder};
use screener_core::news::entity::NewsItem;
use screener_core::score::entity::{
    CompositeResult, EXCLUDED_PRIORITY, Grade, NewsResult, PricePlan, TechnicalResult,
};
use screener_market::minute::MinuteFetcher;
use screener_news::{KeywordTables, NewsAnalyzer};
use screener_technical::TechnicalAnalyzer;
use std::sync::Arc;
use tracing::debug;

/// 负面风险扣分档位
const SEVERE_NEGATIVE_RISK: Decimal = dec!(-20);
const MILD_NEGATIVE_RISK: Decimal = dec!(-10);
const FADING_RISK_THRESHOLD: Decimal = dec!(-10);

/// # Summary
/// 综合评分器：并列运行技术面与新闻面分析，合成总分、评级与最终交易计划。
///
/// # Invariants
/// - 单只股票的分析是纯函数，不修改输入，可被多个线程同时调用。
/// - 分析入口从不返回错误，协作方失败一律降级。
pub struct ScoreCalculator {
    pub(crate) engine: EngineConfig,
    pub(crate) batch: BatchConfig,
    technical: TechnicalAnalyzer,
    news: NewsAnalyzer,
    rounder: Arc<dyn TickRounder>,
}

/// 惩罚与加成的中间结果
#[derive(Debug, Default)]
struct Adjustments {
    negative_penalty: Decimal,
    fading_penalty: Decimal,
    bonus: Decimal,
    has_negative_news: bool,
    has_fading_risk: bool,
}

impl ScoreCalculator {
    /// # Summary
    /// 创建综合评分器。
    ///
    /// # Arguments
    /// * `engine`: 评分参数。
    /// * `batch`: 分钟线抓取与并发参数。
    /// * `tables`: 新闻关键词表。
    /// * `rounder`: 价格取整协作方。
    pub fn new(
        engine: EngineConfig,
        batch: BatchConfig,
        tables: KeywordTables,
        rounder: Arc<dyn TickRounder>,
    ) -> Self {
        Self {
            technical: TechnicalAnalyzer::new(engine.clone(), rounder.clone()),
            news: NewsAnalyzer::new(tables),
            engine,
            batch,
            rounder,
        }
    }

    pub fn from_config(config: &AppConfig, tables: KeywordTables, rounder: Arc<dyn TickRounder>) -> Self {
        Self::new(config.engine.clone(), config.batch.clone(), tables, rounder)
    }

    /// # Summary
    /// 单只股票分析入口，可选地先抓取分钟线。
    ///
    /// # Logic
    /// 1. 提供了分钟线数据源时，在配置的超时内抓取；超时、失败或空数据都降级为仅日线。
    /// 2. 委托给 `analyze_with_minutes`。
    pub async fn analyze_stock(
        &self,
        stock: &Stock,
        news: &[NewsItem],
        analysis_date: NaiveDate,
        minute_provider: Option<Arc<dyn MinuteDataProvider>>,
    ) -> CompositeResult {
        let minutes = match minute_provider {
            Some(provider) => MinuteFetcher::new(provider, &self.batch).fetch(&stock.code).await,
            None => None,
        };
        self.analyze_with_minutes(stock, news, analysis_date, minutes.as_deref())
    }

    /// # Summary
    /// 纯同步的单只股票综合评分。
    ///
    /// # Logic
    /// 1. 技术面与新闻面独立分析。
    /// 2. 原始合计 = 技术分 + 新闻分，不做归一化。
    /// 3. 负面风险与消退风险扣分，技术/新闻均衡加分，截断到 [score_floor, score_ceiling]。
    /// 4. 按总分评级，再按技术/新闻门槛与消退风险降级；负面新闻或技术分低于下限直接排除。
    /// 5. 在技术面计划的基础上按新闻与消退风险调整目标/止损并重新取整。
    ///
    /// # Returns
    /// 新建的不可变综合结果。
    pub fn analyze_with_minutes(
        &self,
        stock: &Stock,
        news: &[NewsItem],
        analysis_date: NaiveDate,
        minutes: Option<&[MinutePricePoint]>,
    ) -> CompositeResult {
        let technical = self.technical.analyze(stock, minutes);
        let news = self.news.analyze(news, analysis_date, &stock.daily_prices);

        let tech = technical.total;
        let news_score = news.score;
        let raw_total = tech + news_score;
        let adj = adjustments(&technical, &news);
        let total_score = (raw_total + adj.negative_penalty + adj.fading_penalty + adj.bonus)
            .clamp(self.engine.score_floor, self.engine.score_ceiling);

        let (grade, priority) = self.classify(total_score, tech, news_score, &adj);
        let plan = technical
            .plan
            .as_ref()
            .map(|p| self.adjust_plan(p, news_score, adj.has_fading_risk));
        let expected_return = plan.as_ref().and_then(expected_return);
        let reasons = reasons(&technical, &news, &adj, grade);

        debug!(
            "{}: technical {} + news {} -> {} ({}, priority {})",
            stock.code, tech, news_score, total_score, grade, priority
        );

        CompositeResult {
            code: stock.code.clone(),
            name: stock.name.clone(),
            analysis_date,
            technical_score: tech,
            news_score,
            raw_total,
            total_score,
            grade,
            priority,
            has_negative_news: adj.has_negative_news,
            has_fading_risk: adj.has_fading_risk,
            plan,
            expected_return,
            reasons,
            technical,
            news,
        }
    }

    /// # Summary
    /// 由截断后的总分确定评级与优先级。
    ///
    /// # Logic
    /// 1. 负面新闻直接排除。
    /// 2. >=90 S，>=80 A，>=70 B，>=60 WATCH，其余排除。
    /// 3. S 需要技术 >= 60 且新闻 >= 15，否则降为 A；A 需要技术 >= 50 且新闻 >= 10，否则降为 B。
    /// 4. 消退风险再降一档，优先级 +1。
    /// 5. 技术分低于 `technical_floor` 的结果排除。
    fn classify(&self, total: Decimal, tech: Decimal, news: Decimal, adj: &Adjustments) -> (Grade, u32) {
        if adj.has_negative_news {
            return (Grade::Excluded, EXCLUDED_PRIORITY);
        }
        let mut grade = if total >= dec!(90) {
            Grade::S
        } else if total >= dec!(80) {
            Grade::A
        } else if total >= dec!(70) {
            Grade::B
        } else if total >= dec!(60) {
            Grade::Watch
        } else {
            Grade::Excluded
        };
        if grade == Grade::S && !(tech >= dec!(60) && news >= dec!(15)) {
            grade = Grade::A;
        }
        if grade == Grade::A && !(tech >= dec!(50) && news >= dec!(10)) {
            grade = Grade::B;
        }
        let mut priority = grade.base_priority();
        if adj.has_fading_risk && grade != Grade::Excluded {
            priority += 1;
            grade = grade.demote();
        }
        if tech < self.engine.technical_floor {
            return (Grade::Excluded, EXCLUDED_PRIORITY);
        }
        (grade, priority)
    }

    /// # Summary
    /// 按新闻强度与消退风险调整计划。
    ///
    /// # Logic
    /// 1. 新闻 >= 20 目标价 ×1.10，>= 15 ×1.05。
    /// 2. 消退风险：目标价再 ×0.90；止损幅度 ×1.10（放宽止损），以买入价为基准重算止损价。
    /// 3. 调整后的价格重新取整，买入价保持不变。
    fn adjust_plan(&self, plan: &PricePlan, news: Decimal, fading: bool) -> PricePlan {
        let mut target_factor = if news >= dec!(20) {
            dec!(1.10)
        } else if news >= dec!(15) {
            dec!(1.05)
        } else {
            Decimal::ONE
        };
        let mut adjusted = plan.clone();
        if fading {
            target_factor *= dec!(0.90);
            adjusted.stop_loss_rate = plan.stop_loss_rate * dec!(1.10);
            adjusted.stop_loss_price = self
                .rounder
                .round_to_tick(plan.buy_price * (Decimal::ONE - adjusted.stop_loss_rate));
        }
        adjusted.target_price = self.rounder.round_to_tick(plan.target_price * target_factor);
        adjusted
    }
}

fn adjustments(technical: &TechnicalResult, news: &NewsResult) -> Adjustments {
    let mut adj = Adjustments::default();
    if news.negative_risk < SEVERE_NEGATIVE_RISK {
        adj.negative_penalty = dec!(-15);
        adj.has_negative_news = true;
    } else if news.negative_risk <= MILD_NEGATIVE_RISK {
        adj.negative_penalty = dec!(-10);
        adj.has_negative_news = true;
    }
    if news.fading_risk < FADING_RISK_THRESHOLD {
        adj.fading_penalty = dec!(-10);
        adj.has_fading_risk = true;
    }
    adj.bonus = balance_bonus(technical.total, news.score);
    adj
}

/// # Summary
/// 技术面与新闻面均衡加分。
///
/// # Logic
/// +5：技术 >= 50 且新闻 >= 15；+3：技术 >= 60 且新闻 >= 10；
/// +2：技术 >= 65 且新闻 >= 0，或新闻 >= 20 且技术 >= 40；否则 0。
pub fn balance_bonus(tech: Decimal, news: Decimal) -> Decimal {
    if tech >= dec!(50) && news >= dec!(15) {
        dec!(5)
    } else if tech >= dec!(60) && news >= dec!(10) {
        dec!(3)
    } else if (tech >= dec!(65) && news >= Decimal::ZERO) || (news >= dec!(20) && tech >= dec!(40)) {
        dec!(2)
    } else {
        Decimal::ZERO
    }
}

/// 预期收益率 (目标 - 买入) / 买入 × 100，保留两位小数
pub fn expected_return(plan: &PricePlan) -> Option<Decimal> {
    if plan.buy_price <= Decimal::ZERO {
        return None;
    }
    let pct = (plan.target_price - plan.buy_price) / plan.buy_price * Decimal::ONE_HUNDRED;
    Some(pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn reasons(technical: &TechnicalResult, news: &NewsResult, adj: &Adjustments, grade: Grade) -> Vec<String> {
    let mut out = vec![
        format!("technical {} ({}): {}", technical.total.round_dp(2), technical.status, technical.trend_status),
        format!("news {} ({}): {}", news.score, news.status, news.main_factor),
    ];
    if adj.has_negative_news {
        out.push(format!("negative news penalty {}", adj.negative_penalty));
    }
    if adj.has_fading_risk {
        out.push(format!("fading risk penalty {}", adj.fading_penalty));
    }
    if !adj.bonus.is_zero() {
        out.push(format!("balance bonus +{}", adj.bonus));
    }
    if technical.timeframe_aligned {
        out.push("daily and minute trends aligned".to_string());
    }
    out.extend(technical.risk_warnings.iter().cloned());
    out.extend(news.risk_warnings.iter().cloned());
    if grade == Grade::Excluded && !adj.has_negative_news {
        out.push("below grading threshold".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_market::tick::KrxTickRounder;

    fn calculator() -> ScoreCalculator {
        ScoreCalculator::new(
            EngineConfig::default(),
            BatchConfig::default(),
            KeywordTables::default(),
            Arc::new(KrxTickRounder::new()),
        )
    }

    fn fading() -> Adjustments {
        Adjustments {
            has_fading_risk: true,
            ..Adjustments::default()
        }
    }

    #[test]
    fn test_s_needs_strong_technical_and_news() {
        let calc = calculator();
        let none = Adjustments::default();
        assert_eq!(calc.classify(dec!(95), dec!(60), dec!(15), &none), (Grade::S, 1));
        // 技术 < 60：S -> A
        assert_eq!(calc.classify(dec!(95), dec!(55), dec!(60), &none), (Grade::A, 2));
        // 新闻 < 15：S -> A
        assert_eq!(calc.classify(dec!(95), dec!(70), dec!(12), &none), (Grade::A, 2));
    }

    #[test]
    fn test_a_needs_technical_fifty_and_news_ten() {
        let calc = calculator();
        let none = Adjustments::default();
        // 技术 45、新闻 60、总分 100：S -> A -> B
        assert_eq!(calc.classify(dec!(100), dec!(45), dec!(60), &none), (Grade::B, 3));
        // 新闻 < 10：A -> B
        assert_eq!(calc.classify(dec!(85), dec!(70), dec!(5), &none), (Grade::B, 3));
        assert_eq!(calc.classify(dec!(85), dec!(50), dec!(10), &none), (Grade::A, 2));
    }

    #[test]
    fn test_watch_band_and_cutoff() {
        let calc = calculator();
        let none = Adjustments::default();
        assert_eq!(calc.classify(dec!(75), dec!(50), dec!(25), &none), (Grade::B, 3));
        assert_eq!(calc.classify(dec!(65), dec!(45), dec!(20), &none), (Grade::Watch, 4));
        assert_eq!(
            calc.classify(dec!(59), dec!(45), dec!(14), &none),
            (Grade::Excluded, EXCLUDED_PRIORITY)
        );
    }

    #[test]
    fn test_fading_demotes_one_grade() {
        let calc = calculator();
        assert_eq!(calc.classify(dec!(95), dec!(60), dec!(20), &fading()), (Grade::A, 2));
        // B -> WATCH
        assert_eq!(calc.classify(dec!(75), dec!(50), dec!(25), &fading()), (Grade::Watch, 4));
        // WATCH 保持 WATCH，优先级 5
        assert_eq!(calc.classify(dec!(65), dec!(45), dec!(20), &fading()), (Grade::Watch, 5));
        assert_eq!(
            calc.classify(dec!(50), dec!(45), dec!(5), &fading()),
            (Grade::Excluded, EXCLUDED_PRIORITY)
        );
    }

    #[test]
    fn test_negative_news_and_technical_floor_exclude() {
        let calc = calculator();
        let negative = Adjustments {
            has_negative_news: true,
            ..Adjustments::default()
        };
        assert_eq!(
            calc.classify(dec!(100), dec!(80), dec!(20), &negative),
            (Grade::Excluded, EXCLUDED_PRIORITY)
        );
        assert_eq!(
            calc.classify(dec!(100), dec!(39), dec!(60), &Adjustments::default()),
            (Grade::Excluded, EXCLUDED_PRIORITY)
        );
    }

    #[test]
    fn test_balance_bonus_tiers() {
        assert_eq!(balance_bonus(dec!(50), dec!(15)), dec!(5));
        assert_eq!(balance_bonus(dec!(60), dec!(10)), dec!(3));
        assert_eq!(balance_bonus(dec!(65), dec!(0)), dec!(2));
        assert_eq!(balance_bonus(dec!(40), dec!(20)), dec!(2));
        assert_eq!(balance_bonus(dec!(45), dec!(19)), Decimal::ZERO);
    }

    #[test]
    fn test_expected_return_rounds_to_two_places() {
        let plan = PricePlan {
            buy_price: dec!(110),
            target_price: dec!(112),
            stop_loss_price: dec!(109),
            target_rate: dec!(0.018),
            stop_loss_rate: dec!(0.007),
            atr14: None,
            atr5: dec!(1),
            atr3: dec!(1),
            minute_atr: None,
        };
        assert_eq!(expected_return(&plan), Some(dec!(1.82)));
    }
}
