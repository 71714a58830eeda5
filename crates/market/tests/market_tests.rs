use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use screener_core::config::BatchConfig;
use screener_core::market::entity::MinutePricePoint;
use screener_core::market::error::MarketError;
use screener_core::market::port::{MinuteDataProvider, TickRounder, TradingCalendar};
use screener_core::testing::minute_series;
use screener_market::calendar::WeekdayCalendar;
use screener_market::minute::MinuteFetcher;
use screener_market::tick::KrxTickRounder;
use std::sync::Arc;
use std::time::Duration;

/// # Summary
/// 按预设行为响应的分钟线数据源。
enum MockMinutes {
    Ok(usize),
    Fail,
    Slow(Duration),
}

#[async_trait]
impl MinuteDataProvider for MockMinutes {
    async fn fetch_minutes(
        &self,
        _code: &str,
        interval: u32,
        _days: u32,
    ) -> Result<Vec<MinutePricePoint>, MarketError> {
        assert_eq!(interval, 1);
        match self {
            MockMinutes::Ok(n) => Ok(minute_series(*n, dec!(100), dec!(0.1), 500)),
            MockMinutes::Fail => Err(MarketError::Network("connection reset".into())),
            MockMinutes::Slow(d) => {
                tokio::time::sleep(*d).await;
                Ok(minute_series(120, dec!(100), dec!(0.1), 500))
            }
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_calendar_skips_weekends_and_holidays() {
    // 2024-03-01 (周五) 为三一节
    let calendar = WeekdayCalendar::new([date(2024, 3, 1)]);
    assert!(calendar.is_trading_day(date(2024, 2, 29)));
    assert!(!calendar.is_trading_day(date(2024, 3, 1)));
    assert!(!calendar.is_trading_day(date(2024, 3, 2)));
    assert!(!calendar.is_trading_day(date(2024, 3, 3)));
    // 周日回溯跳过周末与假日，落到周四
    assert_eq!(calendar.last_trading_day(date(2024, 3, 3)), date(2024, 2, 29));
    assert_eq!(calendar.last_trading_day(date(2024, 3, 4)), date(2024, 3, 4));
}

#[test]
fn test_krx_rounder_through_port() {
    let rounder: Arc<dyn TickRounder> = Arc::new(KrxTickRounder::new());
    assert_eq!(rounder.round_to_tick(dec!(54321)), dec!(54300));
    assert_eq!(rounder.round_to_tick(dec!(1234.4)), dec!(1234));
}

#[tokio::test]
async fn test_minute_fetch_success() -> anyhow::Result<()> {
    let fetcher = MinuteFetcher::new(Arc::new(MockMinutes::Ok(150)), &BatchConfig::default());
    let bars = fetcher.try_fetch("005930").await?;
    assert_eq!(bars.len(), 150);
    assert_eq!(fetcher.fetch("005930").await.map(|b| b.len()), Some(150));
    Ok(())
}

#[tokio::test]
async fn test_minute_fetch_failure_downgrades() {
    let fetcher = MinuteFetcher::new(Arc::new(MockMinutes::Fail), &BatchConfig::default());
    assert!(matches!(fetcher.try_fetch("005930").await, Err(MarketError::Network(_))));
    assert!(fetcher.fetch("005930").await.is_none());

    let empty = MinuteFetcher::new(Arc::new(MockMinutes::Ok(0)), &BatchConfig::default());
    assert!(empty.fetch("005930").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_minute_fetch_times_out() {
    let config = BatchConfig {
        minute_timeout_ms: 50,
        ..BatchConfig::default()
    };
    let fetcher = MinuteFetcher::new(Arc::new(MockMinutes::Slow(Duration::from_secs(5))), &config);
    assert!(matches!(fetcher.try_fetch("005930").await, Err(MarketError::Timeout(50))));
    assert!(fetcher.fetch("005930").await.is_none());
}
