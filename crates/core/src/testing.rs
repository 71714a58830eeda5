//! 测试用行情与新闻构造器，仅在 `test-utils` 特性下编译。

use crate::common::MarketKind;
use crate::market::entity::{MinutePricePoint, PricePoint, Stock};
use crate::news::entity::NewsItem;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

/// 序列起点 (2024-01-01 00:00 UTC)
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// 构造第 `index` 根日线
pub fn daily_bar(index: usize, open: i64, high: i64, low: i64, close: i64, volume: i64) -> PricePoint {
    PricePoint {
        time: base_time() + Duration::days(i64::try_from(index).unwrap_or_default()),
        open: Decimal::from(open),
        high: Decimal::from(high),
        low: Decimal::from(low),
        close: Decimal::from(close),
        volume,
    }
}

/// # Summary
/// 完全无波动的日线序列：开高低收全部相同，成交量恒定。
pub fn flat_series(len: usize, price: i64, volume: i64) -> Vec<PricePoint> {
    (0..len)
        .map(|i| daily_bar(i, price, price, price, price, volume))
        .collect()
}

/// # Summary
/// 均线多头排列、RSI 处于回调买入区、最新一根放量三倍的 60 根日线。
///
/// # Logic
/// 1. 第 0–44 根：收盘 100，高 101 低 99，成交量 1000。
/// 2. 第 45 根：单日冲高至 124。
/// 3. 第 46 根：回落至 100。
/// 4. 第 47–59 根：每日上涨 1 的实体阳线，收盘 101..113。
/// 5. 最新一根成交量 3000。
pub fn pullback_uptrend_series() -> Vec<PricePoint> {
    let mut bars = Vec::with_capacity(60);
    for i in 0..45 {
        bars.push(daily_bar(i, 100, 101, 99, 100, 1000));
    }
    bars.push(daily_bar(45, 100, 124, 100, 124, 1000));
    bars.push(daily_bar(46, 101, 102, 99, 100, 1000));
    for i in 47..60_i64 {
        let close = i + 54;
        let volume = if i == 59 { 3000 } else { 1000 };
        bars.push(daily_bar(
            usize::try_from(i).unwrap_or_default(),
            close - 1,
            close,
            close - 1,
            close,
            volume,
        ));
    }
    bars
}

/// # Summary
/// 从 `start` 起每根变动 `step` 的分钟线序列（1 分钟周期）。
pub fn minute_series(len: usize, start: Decimal, step: Decimal, volume: i64) -> Vec<MinutePricePoint> {
    let mut out: Vec<MinutePricePoint> = Vec::with_capacity(len);
    let mut close = start;
    for i in 0..len {
        let open = close;
        close = open + step;
        let bar = PricePoint {
            time: base_time() + Duration::minutes(i64::try_from(i).unwrap_or_default()),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume,
        };
        let prev = out.last().map(|m| m.bar.close);
        out.push(MinutePricePoint::derive(bar, 1, prev));
    }
    out
}

/// 构造候选证券
pub fn stock(code: &str, daily_prices: Vec<PricePoint>) -> Stock {
    Stock {
        code: code.to_string(),
        name: format!("TEST-{code}"),
        daily_prices,
        sector: "전기전자".to_string(),
        market: MarketKind::Kospi,
    }
}

/// 构造在指定日期发布的新闻
pub fn news(title: &str, content: &str, source: &str, published: NaiveDate) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        content: content.to_string(),
        source: source.to_string(),
        publish_date: published
            .and_hms_opt(9, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(base_time),
    }
}
