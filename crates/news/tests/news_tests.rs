use chrono::{Days, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::news::entity::NewsItem;
use screener_core::testing::{daily_bar, flat_series, news, pullback_uptrend_series};
use screener_news::{KeywordTables, KeywordTier, NewsAnalyzer};

fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn days_before(n: u64) -> NaiveDate {
    analysis_date().checked_sub_days(Days::new(n)).unwrap()
}

#[test]
fn test_no_news_is_neutral() {
    let result = NewsAnalyzer::default().analyze(&[], analysis_date(), &pullback_uptrend_series());
    assert_eq!(result.score, dec!(60));
    assert_eq!(result.fading_risk, Decimal::ZERO);
    assert_eq!(result.negative_risk, Decimal::ZERO);
    assert_eq!(result.main_factor, "no news");
    assert_eq!(result.item_count, 0);
}

#[test]
fn test_future_news_is_ignored() {
    let future = analysis_date().checked_add_days(Days::new(1)).unwrap();
    let items = vec![news("삼성전자 신규계약", "", "한국경제", future)];
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &pullback_uptrend_series());
    assert_eq!(result.score, dec!(60));
    assert_eq!(result.item_count, 0);
}

#[test]
fn test_contract_win_from_major_press() {
    let items = vec![news(
        "삼성전자, 정부 반도체 정책 수혜 속 신규계약 체결",
        "대형 고객사와 신규계약을 맺었다",
        "한국경제",
        analysis_date(),
    )];
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &pullback_uptrend_series());

    assert_eq!(result.freshness, dec!(60));
    assert_eq!(result.impact, dec!(40));
    assert_eq!(result.credibility, dec!(16));
    assert_eq!(result.sustainability, dec!(28));
    assert_eq!(result.fading_risk, Decimal::ZERO);
    assert_eq!(result.negative_risk, Decimal::ZERO);
    assert_eq!(result.score, dec!(120));
    assert_eq!(result.positive_keywords, vec!["신규계약".to_string()]);
    assert!(result.negative_keywords.is_empty());
    assert_eq!(result.main_factor, "신규계약");
    assert_eq!(result.sustainability_status, "mid-term");
}

#[test]
fn test_any_negative_keyword_forces_twenty() {
    let items = vec![
        news("대규모 공급계약 수주", "정부 정책 수혜", "DART 공시", analysis_date()),
        news("전 대표 횡령 혐의", "", "연합뉴스", analysis_date()),
    ];
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &pullback_uptrend_series());
    assert_eq!(result.score, dec!(20));
    assert_eq!(result.negative_risk, dec!(-120));
    assert_eq!(result.status, "severe negative news");
    assert_eq!(result.sustainability_status, "very low (negative)");
    assert_eq!(result.negative_keywords, vec!["횡령".to_string()]);
    assert_eq!(result.main_factor, "횡령");
    assert!(!result.positive_keywords.is_empty());
}

#[test]
fn test_negative_risk_sums_and_floors() {
    let analyzer = NewsAnalyzer::default();
    let lawsuit = vec![news("특허 소송 제기", "", "전자신문", analysis_date())];
    let result = analyzer.analyze(&lawsuit, analysis_date(), &[]);
    assert_eq!(result.negative_risk, dec!(-60));
    assert_eq!(result.score, dec!(20));

    let many = vec![
        news("소송", "", "", analysis_date()),
        news("리콜", "", "", analysis_date()),
        news("거래정지", "", "", analysis_date()),
    ];
    let result = analyzer.analyze(&many, analysis_date(), &[]);
    assert_eq!(result.negative_risk, dec!(-120));
}

#[test]
fn test_freshness_takes_newest_item() {
    let items = vec![
        news("신제품 출시", "", "", days_before(10)),
        news("신제품 출시", "", "", days_before(2)),
    ];
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &[]);
    assert_eq!(result.freshness, dec!(40));
    assert_eq!(result.credibility, dec!(4));
    assert_eq!(result.impact, dec!(16));
}

#[test]
fn test_count_bonus_caps_sustainability() {
    let items: Vec<_> = (0..5)
        .map(|i| news("장기계약 체결", "", "뉴시스", days_before(i)))
        .collect();
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &[]);
    assert_eq!(result.sustainability, dec!(40));
    assert_eq!(result.credibility, dec!(12));
}

#[test]
fn test_fading_risk_from_price_and_keywords() {
    let analyzer = NewsAnalyzer::default();
    let items = vec![news("신규계약", "", "한국경제", analysis_date())];

    // 最新一日暴涨 20%
    let mut surged = flat_series(10, 100, 1000);
    surged.push(daily_bar(10, 100, 120, 100, 120, 1000));
    let result = analyzer.analyze(&items, analysis_date(), &surged);
    assert_eq!(result.fading_risk, dec!(-60));

    // 成交量萎缩到 40%
    let mut thin = flat_series(10, 100, 1000);
    thin.push(daily_bar(10, 100, 100, 100, 100, 400));
    let result = analyzer.analyze(&items, analysis_date(), &thin);
    assert_eq!(result.fading_risk, dec!(-60));

    // 重复公告
    let repeat = vec![news("신규계약 재공시", "", "한국경제", analysis_date())];
    let result = analyzer.analyze(&repeat, analysis_date(), &flat_series(10, 100, 1000));
    assert_eq!(result.fading_risk, dec!(-60));
    assert!(result.risk_warnings.iter().any(|w| w == "repeat announcement"));

    let result = analyzer.analyze(&items, analysis_date(), &flat_series(10, 100, 1000));
    assert_eq!(result.fading_risk, Decimal::ZERO);
}

#[test]
fn test_weak_stale_news_with_fading_floors_at_zero() {
    // 旧闻 + 消退：raw = (0 + 16 + 4 + 0 - 60) × 4 < 0
    let items = vec![news("평범한 소식", "", "", days_before(30))];
    let mut thin = flat_series(10, 100, 1000);
    thin.push(daily_bar(10, 100, 100, 100, 100, 100));
    let result = NewsAnalyzer::default().analyze(&items, analysis_date(), &thin);
    // 60 + (-160 / 2) = -20 -> 0
    assert_eq!(result.score, Decimal::ZERO);
    assert_eq!(result.status, "negative");
}

#[test]
fn test_injected_tables_replace_defaults() {
    let tables = KeywordTables {
        impact: vec![KeywordTier::new(40, &["rocket"])],
        negative: Default::default(),
        negative_penalty: Default::default(),
        ..KeywordTables::default()
    };
    let items = vec![news("ROCKET launch", "횡령", "", analysis_date())];
    let result = NewsAnalyzer::new(tables).analyze(&items, analysis_date(), &[]);
    // 大小写不敏感；自定义表中没有负面关键词
    assert_eq!(result.impact, dec!(40));
    assert_ne!(result.score, dec!(20));
}

#[test]
fn test_json_tables_match_mixed_case_keywords() {
    let tables = KeywordTables::from_json_str(
        r#"{
            "impact": [{ "score": "40", "keywords": ["Rocket"] }],
            "credibility": [{ "score": "20", "keywords": ["DART"] }]
        }"#,
    )
    .unwrap();
    let items = vec![news("Rocket launch", "", "DART", analysis_date())];
    let result = NewsAnalyzer::new(tables).analyze(&items, analysis_date(), &[]);
    assert_eq!(result.impact, dec!(40));
    assert_eq!(result.credibility, dec!(20));
}

#[test]
fn test_news_age_uses_exchange_calendar_day() {
    let analyzer = NewsAnalyzer::default();

    // 2024-03-05 08:00 KST 仍是 UTC 的 3 月 4 日，但已是分析日之后
    let next_day = vec![NewsItem {
        publish_date: Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap(),
        ..news("신규계약", "", "한국경제", analysis_date())
    }];
    let result = analyzer.analyze(&next_day, analysis_date(), &[]);
    assert_eq!(result.item_count, 0);
    assert_eq!(result.score, dec!(60));

    // 2024-03-02 01:00 KST：UTC 日期为 3 月 1 日，按交易所日期计 2 天
    let early_morning = vec![NewsItem {
        publish_date: Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap(),
        ..news("신제품 출시", "", "", analysis_date())
    }];
    let result = analyzer.analyze(&early_morning, analysis_date(), &[]);
    assert_eq!(result.item_count, 1);
    assert_eq!(result.freshness, dec!(40));
}
