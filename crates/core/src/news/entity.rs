use crate::common::time::exchange_date;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单条新闻实体，引擎的只读输入。
///
/// # Invariants
/// - 由新闻抓取协作方创建，按股票代码分组后提供给一次分析运行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    // 标题
    pub title: String,
    // 正文或摘要
    #[serde(default)]
    pub content: String,
    // 来源媒体或公告渠道
    #[serde(default)]
    pub source: String,
    // 发布时间
    pub publish_date: DateTime<Utc>,
}

impl NewsItem {
    /// # Summary
    /// 计算新闻相对分析日期的自然日龄，发布日期按交易所本地时区取日。
    ///
    /// # Returns
    /// 发布日期晚于分析日期时返回负数。
    pub fn age_days(&self, analysis_date: NaiveDate) -> i64 {
        (analysis_date - exchange_date(self.publish_date)).num_days()
    }

    /// 标题与正文拼接后的小写文本，用于关键词包含匹配
    pub fn normalized_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item_at(publish_date: DateTime<Utc>) -> NewsItem {
        NewsItem {
            title: "공시".to_string(),
            content: String::new(),
            source: String::new(),
            publish_date,
        }
    }

    #[test]
    fn test_age_days_at_kst_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        // 3/4 14:59 UTC = 3/4 23:59 KST
        assert_eq!(item_at(Utc.with_ymd_and_hms(2024, 3, 4, 14, 59, 0).unwrap()).age_days(date), 0);
        // 3/4 15:00 UTC = 3/5 00:00 KST
        assert_eq!(item_at(Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap()).age_days(date), -1);
        // 3/3 15:00 UTC = 3/4 00:00 KST
        assert_eq!(item_at(Utc.with_ymd_and_hms(2024, 3, 3, 15, 0, 0).unwrap()).age_days(date), 0);
    }
}
