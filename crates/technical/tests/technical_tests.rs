use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::config::EngineConfig;
use screener_core::score::entity::TechnicalGrade;
use screener_core::testing::{daily_bar, flat_series, minute_series, pullback_uptrend_series, stock};
use screener_market::tick::KrxTickRounder;
use screener_technical::TechnicalAnalyzer;
use std::sync::Arc;

fn analyzer() -> TechnicalAnalyzer {
    TechnicalAnalyzer::new(EngineConfig::default(), Arc::new(KrxTickRounder::new()))
}

#[test]
fn test_short_history_is_insufficient() {
    let result = analyzer().analyze(&stock("000001", flat_series(29, 100, 1000)), None);
    assert!(result.is_insufficient());
    assert_eq!(result.total, Decimal::ZERO);
    assert_eq!(result.grade, TechnicalGrade::D);
    assert!(result.plan.is_none());

    // 恰好 30 根即可分析
    let result = analyzer().analyze(&stock("000001", flat_series(30, 100, 1000)), None);
    assert!(!result.is_insufficient());
}

#[test]
fn test_malformed_bar_is_insufficient() {
    let mut series = flat_series(40, 100, 1000);
    series[10] = daily_bar(10, 100, 95, 105, 100, 1000);
    let result = analyzer().analyze(&stock("000002", series), None);
    assert!(result.is_insufficient());
}

#[test]
fn test_flat_market_scores_low() {
    let result = analyzer().analyze(&stock("000003", flat_series(60, 100, 1000)), None);
    // 回踩 3 + 动量 9 + 支撑阻力 8 + 供需 2
    assert_eq!(result.total, dec!(22));
    assert_eq!(result.trend, dec!(3));
    assert_eq!(result.momentum, dec!(9));
    assert_eq!(result.pattern, Decimal::ZERO);
    assert_eq!(result.grade, TechnicalGrade::D);
    assert_eq!(result.indicators.rsi, Some(dec!(50)));
    assert!(result.risk_warnings.is_empty());

    let plan = result.plan.unwrap();
    assert_eq!(plan.buy_price, dec!(100));
    assert_eq!(plan.stop_loss_rate, Decimal::ZERO);
    assert_eq!(plan.target_rate, dec!(0.015));
}

#[test]
fn test_pullback_uptrend_daily_only() {
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), None);

    assert_eq!(result.ma_alignment, dec!(12));
    assert_eq!(result.macd, dec!(6));
    assert_eq!(result.pullback, dec!(2));
    assert_eq!(result.trend, dec!(20));
    assert_eq!(result.momentum, dec!(23));
    assert_eq!(result.pattern, dec!(11));
    assert_eq!(result.support_resistance, dec!(6));
    assert_eq!(result.supply_demand, dec!(4));
    assert_eq!(result.total, dec!(64));
    assert_eq!(result.grade, TechnicalGrade::A);
    assert!(result.minute.is_none());
    assert!(!result.timeframe_aligned);
    assert!(result.risk_warnings.is_empty());
    assert_eq!(result.trend_status, "strong uptrend (MA5 > MA10 > MA20)");

    let plan = result.plan.unwrap();
    assert_eq!(plan.atr5, dec!(1));
    assert_eq!(plan.buy_price, dec!(110));
    assert_eq!(plan.target_price, dec!(112));
    assert_eq!(plan.stop_loss_price, dec!(110));
    assert_eq!(plan.target_rate, dec!(0.018));
    assert!(plan.stop_loss_rate <= dec!(0.015));
    assert!(plan.minute_atr.is_none());
}

#[test]
fn test_minute_data_rescales_daily_part() {
    let minutes = minute_series(120, dec!(113), dec!(0.1), 1000);
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), Some(&minutes));

    let minute = result.minute.clone().unwrap();
    assert_eq!(minute.trend, dec!(8));
    assert_eq!(minute.momentum, dec!(1));
    assert_eq!(minute.timing, dec!(3));
    // 64 × 0.75 + 12
    assert_eq!(result.total, dec!(60));
    assert_eq!(result.trend, dec!(15));
    assert_eq!(result.grade, TechnicalGrade::A);
    assert!(result.timeframe_aligned);
    assert!(result.risk_warnings.iter().any(|w| w.starts_with("minute overbought")));
    assert_eq!(result.plan.unwrap().minute_atr, Some(dec!(0.1)));
}

#[test]
fn test_short_minute_series_is_ignored() {
    let minutes = minute_series(50, dec!(113), dec!(0.1), 1000);
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), Some(&minutes));
    assert!(result.minute.is_none());
    assert_eq!(result.total, dec!(64));
}

#[test]
fn test_rally_without_volume_raises_warnings() {
    let mut series = flat_series(55, 100, 1000);
    for (offset, close) in [105, 110, 115, 120, 126].into_iter().enumerate() {
        series.push(daily_bar(55 + offset, close, close, close, close, 500));
    }
    let result = analyzer().analyze(&stock("035720", series), None);
    let has = |prefix: &str| result.risk_warnings.iter().any(|w| w.starts_with(prefix));
    assert!(has("overbought (RSI > 80)"));
    assert!(has("post-rally pullback risk"));
    assert!(has("excessive rally"));
    assert!(has("price up without volume confirmation"));
    // 总分低于 40 而 5 日涨幅 26%
    assert!(result.total < dec!(40));
    assert!(has("technical weakness mismatch"));
}

#[test]
fn test_minute_surge_warning() {
    // 30 分钟内从 190 涨到 220
    let minutes = minute_series(120, dec!(100), dec!(1), 1000);
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), Some(&minutes));
    assert!(result.minute.is_some());
    assert!(result.indicators.minute_trend_pct.unwrap() > dec!(10));
    assert!(result.risk_warnings.iter().any(|w| w.starts_with("minute surge")));

    // 缓慢上涨不触发
    let calm = minute_series(120, dec!(113), dec!(0.1), 1000);
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), Some(&calm));
    assert!(!result.risk_warnings.iter().any(|w| w.starts_with("minute surge")));
}

#[test]
fn test_malformed_minute_bar_falls_back_to_daily() {
    let mut minutes = minute_series(120, dec!(113), dec!(0.1), 1000);
    minutes[60].bar.low = minutes[60].bar.high + dec!(1);
    let result = analyzer().analyze(&stock("005930", pullback_uptrend_series()), Some(&minutes));
    assert!(result.minute.is_none());
    assert_eq!(result.total, dec!(64));
    assert!(!result.timeframe_aligned);
}

#[test]
fn test_total_stays_within_bounds() {
    let analyzer = analyzer();
    let cases = vec![
        flat_series(60, 100, 1000),
        pullback_uptrend_series(),
        (0..60_i64)
            .map(|i| {
                let close = 200 - i;
                daily_bar(i.try_into().unwrap(), close + 1, close + 2, close - 1, close, 1000)
            })
            .collect(),
    ];
    for series in cases {
        let result = analyzer.analyze(&stock("000000", series), None);
        assert!(result.total >= Decimal::ZERO && result.total <= dec!(80));
        if let Some(plan) = result.plan {
            assert!(plan.stop_loss_rate >= Decimal::ZERO && plan.stop_loss_rate <= dec!(0.015));
        }
    }
}
