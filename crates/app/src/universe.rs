use chrono::NaiveDate;
use screener_core::common::time::TimeProvider;
use screener_core::market::entity::Stock;
use screener_core::market::port::TradingCalendar;
use screener_scoring::batch::NewsByCode;
use serde::Deserialize;

/// # Summary
/// 一次批量运行的输入：候选股票、按代码分组的新闻与可选的分析日期。
#[derive(Debug, Deserialize)]
pub struct Universe {
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    pub stocks: Vec<Stock>,
    #[serde(default)]
    pub news: NewsByCode,
}

impl Universe {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Summary
    /// 确定分析日期：输入中显式给出的日期优先，否则取不晚于今天的最近交易日。
    pub fn resolve_date(&self, calendar: &dyn TradingCalendar, clock: &dyn TimeProvider) -> NaiveDate {
        self.analysis_date
            .unwrap_or_else(|| calendar.last_trading_day(clock.today()))
    }
}
