use chrono::{Datelike, Duration, NaiveDate, Weekday};
use screener_core::market::port::TradingCalendar;
use std::collections::BTreeSet;

/// 向前回溯寻找交易日的最大天数
const MAX_LOOKBACK_DAYS: i64 = 366;

/// # Summary
/// 基于周末与配置假日表的交易日历。
///
/// # Invariants
/// - 周六、周日以及 `holidays` 中的日期均为非交易日。
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// # Logic
    /// 从给定日期起逐日回溯，最多回溯一年；找不到时返回原日期。
    fn last_trading_day(&self, date: NaiveDate) -> NaiveDate {
        (0..MAX_LOOKBACK_DAYS)
            .map(|back| date - Duration::days(back))
            .find(|d| self.is_trading_day(*d))
            .unwrap_or(date)
    }
}
