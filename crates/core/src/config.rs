use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub batch: BatchConfig,
    pub calendar: CalendarConfig,
    pub log: LogConfig,
}

/// # Summary
/// 评分引擎参数。
///
/// # Invariants
/// - `score_floor <= score_ceiling`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // 日线最少根数，不足则技术面为零分
    pub min_daily_bars: usize,
    // 分钟线最少根数，不足则视为无分钟数据
    pub min_minute_bars: usize,
    // 技术面下限，低于此值的综合结果被排除
    pub technical_floor: Decimal,
    // 综合分下限
    pub score_floor: Decimal,
    // 综合分上限
    pub score_ceiling: Decimal,
    // 批量排名保留的最大条数
    pub max_ranked: usize,
    // 关键词表 JSON 文件路径，缺省使用内置表
    pub keywords_path: Option<String>,
}

/// # Summary
/// 批量分析与分钟线抓取参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    // 分钟线周期（分钟）
    pub minute_interval: u32,
    // 分钟线回溯交易日数
    pub minute_days: u32,
    // 单次分钟线抓取超时（毫秒）
    pub minute_timeout_ms: u64,
    // 同时进行的分钟线抓取数量
    pub concurrency: usize,
}

/// 交易日历配置：周末以外的休市日
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub holidays: Vec<NaiveDate>,
}

/// 日志输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // EnvFilter 语法的默认级别，RUST_LOG 优先
    pub level: String,
    // 滚动日志目录，缺省只输出到 stdout
    pub dir: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_daily_bars: 30,
            min_minute_bars: 100,
            technical_floor: dec!(40),
            score_floor: dec!(30),
            score_ceiling: dec!(100),
            max_ranked: 50,
            keywords_path: None,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            minute_interval: 1,
            minute_days: 1,
            minute_timeout_ms: 3000,
            concurrency: 8,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
