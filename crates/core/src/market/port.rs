use crate::market::entity::{MinutePricePoint, PricePoint};
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// # Summary
/// 历史行情数据源接口（券商行情客户端等外部协作方）。
///
/// # Invariants
/// - 返回序列必须按时间升序排列。
/// - 允许返回少于请求数量的数据，引擎将其视为数据不足而非错误。
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// # Summary
    /// 获取日线序列。
    ///
    /// # Arguments
    /// * `code`: 股票代码。
    /// * `days`: 请求的交易日数量上限。
    ///
    /// # Returns
    /// 成功返回日线列表，失败返回 MarketError。
    async fn daily_prices(&self, code: &str, days: u32) -> Result<Vec<PricePoint>, MarketError>;

    /// # Summary
    /// 获取分钟线序列。
    ///
    /// # Arguments
    /// * `code`: 股票代码。
    /// * `interval`: 分钟周期。
    /// * `days`: 回溯的交易日数量。
    ///
    /// # Returns
    /// 成功返回分钟线列表，失败返回 MarketError。
    async fn minute_prices(
        &self,
        code: &str,
        interval: u32,
        days: u32,
    ) -> Result<Vec<MinutePricePoint>, MarketError>;
}

/// # Summary
/// 引擎在“带分钟线”路径中唯一依赖的窄接口。
///
/// # Invariants
/// - 调用方负责超时控制，失败一律降级为仅日线分析。
#[async_trait]
pub trait MinuteDataProvider: Send + Sync {
    async fn fetch_minutes(
        &self,
        code: &str,
        interval: u32,
        days: u32,
    ) -> Result<Vec<MinutePricePoint>, MarketError>;
}

#[async_trait]
impl<T: PriceSource + ?Sized> MinuteDataProvider for T {
    async fn fetch_minutes(
        &self,
        code: &str,
        interval: u32,
        days: u32,
    ) -> Result<Vec<MinutePricePoint>, MarketError> {
        self.minute_prices(code, interval, days).await
    }
}

/// # Summary
/// 价格最小变动单位取整服务。
///
/// # Invariants
/// - 引擎输出的所有价格必须经过此接口处理。
/// - 对非正价格原样返回。
pub trait TickRounder: Send + Sync {
    /// 将原始价格对齐到可交易的最小价位
    fn round_to_tick(&self, price: Decimal) -> Decimal;
}

/// # Summary
/// 交易日历服务，仅供调用方决定何时触发引擎，引擎内部不使用。
pub trait TradingCalendar: Send + Sync {
    /// 判断指定日期是否为交易日
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// 获取不晚于指定日期的最近一个交易日
    fn last_trading_day(&self, date: NaiveDate) -> NaiveDate;
}
