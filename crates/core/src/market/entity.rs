use crate::common::MarketKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线的 OHLCV 访问契约。
///
/// # Invariants
/// - 日线与分钟线共用同一套指标实现，指标函数只通过此 trait 读取数据。
pub trait Bar {
    fn open(&self) -> Decimal;
    fn high(&self) -> Decimal;
    fn low(&self) -> Decimal;
    fn close(&self) -> Decimal;
    fn volume(&self) -> i64;
}

/// # Summary
/// 单根 K 线数据实体（日线或分钟线的基础部分）。
///
/// # Invariants
/// - `high >= max(open, close)`，`low <= min(open, close)`。
/// - 所有价格大于 0，成交量非负。
/// - 由数据源协作方创建，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: Decimal,
    // 最高价
    pub high: Decimal,
    // 最低价
    pub low: Decimal,
    // 收盘价
    pub close: Decimal,
    // 成交量
    pub volume: i64,
}

impl PricePoint {
    /// # Summary
    /// 校验 K 线是否满足价格与成交量不变量。
    pub fn is_valid(&self) -> bool {
        self.open > Decimal::ZERO
            && self.close > Decimal::ZERO
            && self.low > Decimal::ZERO
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.volume >= 0
    }
}

impl Bar for PricePoint {
    fn open(&self) -> Decimal {
        self.open
    }
    fn high(&self) -> Decimal {
        self.high
    }
    fn low(&self) -> Decimal {
        self.low
    }
    fn close(&self) -> Decimal {
        self.close
    }
    fn volume(&self) -> i64 {
        self.volume
    }
}

/// # Summary
/// 分钟 K 线实体，在基础 OHLCV 之上附带周期及派生字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutePricePoint {
    // 基础 OHLCV
    pub bar: PricePoint,
    // 周期（分钟）
    pub interval: u32,
    // 相对上一根收盘的涨跌额
    pub change_amount: Decimal,
    // 相对上一根收盘的涨跌幅（百分比）
    pub change_rate: Decimal,
    // 成交额 (close * volume)
    pub trading_value: Decimal,
}

impl MinutePricePoint {
    /// # Summary
    /// 由基础 K 线与上一根收盘价构造分钟线，计算派生字段。
    ///
    /// # Logic
    /// 1. 无上一根收盘价（序列首根）时涨跌额与涨跌幅为 0。
    /// 2. 成交额按收盘价乘以成交量计算。
    pub fn derive(bar: PricePoint, interval: u32, prev_close: Option<Decimal>) -> Self {
        let (change_amount, change_rate) = match prev_close {
            Some(prev) if !prev.is_zero() => {
                let amount = bar.close - prev;
                (amount, amount / prev * Decimal::ONE_HUNDRED)
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };
        let trading_value = bar.close * Decimal::from(bar.volume);
        Self {
            bar,
            interval,
            change_amount,
            change_rate,
            trading_value,
        }
    }
}

impl Bar for MinutePricePoint {
    fn open(&self) -> Decimal {
        self.bar.open
    }
    fn high(&self) -> Decimal {
        self.bar.high
    }
    fn low(&self) -> Decimal {
        self.bar.low
    }
    fn close(&self) -> Decimal {
        self.bar.close
    }
    fn volume(&self) -> i64 {
        self.bar.volume
    }
}

/// # Summary
/// 候选证券，引擎的只读输入。
///
/// # Invariants
/// - `daily_prices` 按时间升序排列。
/// - 引擎不回写任何字段，分析结果以独立记录返回。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    // 股票代码 (例如: 005930)
    pub code: String,
    // 股票名称
    pub name: String,
    // 日线序列
    #[serde(default)]
    pub daily_prices: Vec<PricePoint>,
    // 所属行业
    #[serde(default)]
    pub sector: String,
    // 所属市场
    #[serde(default)]
    pub market: MarketKind,
}
