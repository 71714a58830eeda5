pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 证券所属的交易市场板块。
///
/// # Invariants
/// - 无法识别的板块统一归入 `Other`，不作为错误处理。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketKind {
    // 主板 (KOSPI)
    Kospi,
    // 创业板 (KOSDAQ)
    Kosdaq,
    // 中小企业板 (KONEX)
    Konex,
    // 其他或未知
    #[default]
    Other,
}

impl FromStr for MarketKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kospi" | "유가증권" => Ok(MarketKind::Kospi),
            "kosdaq" | "코스닥" => Ok(MarketKind::Kosdaq),
            "konex" | "코넥스" => Ok(MarketKind::Konex),
            "other" => Ok(MarketKind::Other),
            _ => Err(format!("Unknown MarketKind: {}", s)),
        }
    }
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketKind::Kospi => write!(f, "KOSPI"),
            MarketKind::Kosdaq => write!(f, "KOSDAQ"),
            MarketKind::Konex => write!(f, "KONEX"),
            MarketKind::Other => write!(f, "OTHER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_kind_round_trip() {
        assert_eq!("KOSPI".parse::<MarketKind>(), Ok(MarketKind::Kospi));
        assert_eq!("코스닥".parse::<MarketKind>(), Ok(MarketKind::Kosdaq));
        assert!("NYSE".parse::<MarketKind>().is_err());
        assert_eq!(MarketKind::Konex.to_string(), "KONEX");
    }
}
