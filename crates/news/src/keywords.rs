use rust_decimal::Decimal;
use screener_core::news::error::NewsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// # Summary
/// 一档关键词：命中任意关键词即得到该档分数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub score: Decimal,
    pub keywords: Vec<String>,
}

impl KeywordTier {
    pub fn new(score: i64, keywords: &[&str]) -> Self {
        Self {
            score: Decimal::from(score),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// 小写子串包含匹配，返回第一个命中的关键词。
    /// 从 JSON 载入的档位保留原始大小写，匹配时统一转小写。
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| !k.is_empty() && text.contains(k.to_lowercase().as_str()))
            .map(String::as_str)
    }
}

/// # Summary
/// 在分档表中取命中档位的最高分。
///
/// # Returns
/// 没有任何档位命中时返回 `default`。
pub fn best_tier(tiers: &[KeywordTier], text: &str, default: Decimal) -> Decimal {
    tiers
        .iter()
        .filter(|t| t.first_match(text).is_some())
        .map(|t| t.score)
        .max()
        .unwrap_or(default)
}

/// 权重表中所有被文本包含的关键词及其权重（按关键词字典序）
pub fn weighted_matches<'a>(table: &'a BTreeMap<String, Decimal>, text: &str) -> Vec<(&'a str, Decimal)> {
    table
        .iter()
        .filter(|(k, _)| !k.is_empty() && text.contains(k.to_lowercase().as_str()))
        .map(|(k, w)| (k.as_str(), *w))
        .collect()
}

/// # Summary
/// 新闻分析使用的全部关键词表，作为不可变配置注入分析器。
///
/// # Invariants
/// - 影响力、可信度、持续性为分档表，取命中档位的最大值。
/// - `negative` 用于提取与报告负面关键词，`negative_penalty` 用于计算负面风险分；
///   两者关键词相同、刻度不同（默认后者为前者的 4 倍）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub impact: Vec<KeywordTier>,
    pub impact_default: Decimal,
    // 按来源字符串匹配
    pub credibility: Vec<KeywordTier>,
    pub credibility_default: Decimal,
    pub sustainability: Vec<KeywordTier>,
    pub sustainability_default: Decimal,
    // 重复公告/旧闻再炒
    pub repeat: Vec<String>,
    pub positive: BTreeMap<String, Decimal>,
    pub negative: BTreeMap<String, Decimal>,
    pub negative_penalty: BTreeMap<String, Decimal>,
}

/// 负面关键词：(关键词, 提取权重, 扣分权重)
const NEGATIVE_DEFAULTS: &[(&str, i64, i64)] = &[
    ("횡령", -30, -120),
    ("배임", -30, -120),
    ("분식회계", -30, -120),
    ("상장폐지", -30, -120),
    ("소송", -15, -60),
    ("압수수색", -15, -60),
    ("감자", -15, -60),
    ("영업정지", -20, -80),
    ("거래정지", -20, -80),
    ("리콜", -12, -48),
    ("적자전환", -12, -48),
    ("실적악화", -8, -32),
    ("어닝쇼크", -10, -40),
    ("유상증자", -10, -40),
    ("불성실공시", -15, -60),
];

const POSITIVE_DEFAULTS: &[(&str, i64)] = &[
    ("신규계약", 15),
    ("공급계약", 15),
    ("수주", 15),
    ("흑자전환", 12),
    ("최대실적", 12),
    ("투자유치", 10),
    ("인수합병", 10),
    ("업무협약", 8),
    ("특허", 8),
    ("신제품", 8),
    ("수출", 8),
    ("신고가", 6),
    ("상한가", 6),
];

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            impact: vec![
                KeywordTier::new(40, &["정부", "정책", "국책", "규제 완화", "산업 전반", "업계 전반", "수혜 업종"]),
                KeywordTier::new(32, &["대규모", "조 원", "조원", "신규계약", "공급계약", "수주"]),
                KeywordTier::new(28, &["관련주", "테마", "수혜주", "동반 상승"]),
            ],
            impact_default: Decimal::from(16),
            credibility: vec![
                KeywordTier::new(20, &["공시", "dart", "금융감독원", "한국거래소", "기업설명회", "ir자료"]),
                KeywordTier::new(16, &["한국경제", "매일경제", "머니투데이", "이데일리", "서울경제", "조선비즈", "파이낸셜뉴스"]),
                KeywordTier::new(12, &["연합뉴스", "연합인포맥스", "뉴시스", "뉴스1", "yonhap"]),
                KeywordTier::new(8, &["전자신문", "디지털타임스", "아이뉴스24", "블로터", "더벨"]),
            ],
            credibility_default: Decimal::from(4),
            sustainability: vec![
                KeywordTier::new(40, &["신사업", "공장 증설", "증설", "장기계약", "사업 확장", "인수합병"]),
                KeywordTier::new(28, &["신규계약", "공급계약", "수주", "파트너십", "업무협약", "mou"]),
                KeywordTier::new(16, &["실적", "영업이익", "매출", "분기"]),
                KeywordTier::new(8, &["이벤트", "일회성", "단기", "상한가", "급등"]),
            ],
            sustainability_default: Decimal::ZERO,
            repeat: ["재공시", "재차", "또다시", "재탕", "이미 알려진", "기존 발표"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            positive: POSITIVE_DEFAULTS
                .iter()
                .map(|(k, w)| ((*k).to_string(), Decimal::from(*w)))
                .collect(),
            negative: NEGATIVE_DEFAULTS
                .iter()
                .map(|(k, w, _)| ((*k).to_string(), Decimal::from(*w)))
                .collect(),
            negative_penalty: NEGATIVE_DEFAULTS
                .iter()
                .map(|(k, _, p)| ((*k).to_string(), Decimal::from(*p)))
                .collect(),
        }
    }
}

impl KeywordTables {
    /// # Summary
    /// 从 JSON 文本加载关键词表，缺失字段使用默认表。
    ///
    /// # Returns
    /// JSON 格式错误时返回 `NewsError::Parse`。
    pub fn from_json_str(json: &str) -> Result<Self, NewsError> {
        serde_json::from_str(json).map_err(|e| NewsError::Parse(format!("keyword tables: {e}")))
    }

    /// 是否命中任何负面扣分关键词
    pub fn has_negative(&self, text: &str) -> bool {
        !weighted_matches(&self.negative_penalty, text).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_penalty_is_four_times_extraction() {
        let tables = KeywordTables::default();
        assert_eq!(tables.negative.len(), tables.negative_penalty.len());
        for (keyword, weight) in &tables.negative {
            assert_eq!(tables.negative_penalty[keyword], *weight * dec!(4), "{keyword}");
        }
    }

    #[test]
    fn test_best_tier_takes_highest_match() {
        let tables = KeywordTables::default();
        assert_eq!(best_tier(&tables.impact, "정부 정책 수혜 속 신규계약", dec!(16)), dec!(40));
        assert_eq!(best_tier(&tables.impact, "평범한 기사", dec!(16)), dec!(16));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tables = KeywordTables::from_json_str(r#"{ "repeat": ["재발표"] }"#).unwrap();
        assert_eq!(tables.repeat, vec!["재발표".to_string()]);
        assert_eq!(tables.impact_default, dec!(16));
        assert!(!tables.negative_penalty.is_empty());

        assert!(KeywordTables::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_json_tier_matches_case_insensitively() {
        let tables = KeywordTables::from_json_str(
            r#"{ "impact": [{ "score": "40", "keywords": ["Rocket"] }] }"#,
        )
        .unwrap();
        assert_eq!(tables.impact[0].first_match("rocket launch"), Some("Rocket"));
        assert_eq!(best_tier(&tables.impact, "rocket launch", dec!(16)), dec!(40));
    }
}
