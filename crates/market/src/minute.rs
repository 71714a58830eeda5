use screener_core::config::BatchConfig;
use screener_core::market::entity::MinutePricePoint;
use screener_core::market::error::MarketError;
use screener_core::market::port::MinuteDataProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// # Summary
/// 带超时的分钟线抓取器。
///
/// # Invariants
/// - 不做重试，重试策略属于数据源协作方。
/// - 超时、失败、空结果都降级为 None，由调用方走仅日线路径。
#[derive(Clone)]
pub struct MinuteFetcher {
    provider: Arc<dyn MinuteDataProvider>,
    interval: u32,
    days: u32,
    timeout: Duration,
}

impl MinuteFetcher {
    /// # Summary
    /// 根据批量配置创建抓取器。
    ///
    /// # Arguments
    /// * `provider`: 分钟线数据源。
    /// * `config`: 周期、回溯天数与超时设置。
    pub fn new(provider: Arc<dyn MinuteDataProvider>, config: &BatchConfig) -> Self {
        Self {
            provider,
            interval: config.minute_interval,
            days: config.minute_days,
            timeout: Duration::from_millis(config.minute_timeout_ms),
        }
    }

    /// # Summary
    /// 在超时限制内抓取分钟线，返回原始结果。
    ///
    /// # Returns
    /// 超时返回 `MarketError::Timeout`。
    pub async fn try_fetch(&self, code: &str) -> Result<Vec<MinutePricePoint>, MarketError> {
        let call = self.provider.fetch_minutes(code, self.interval, self.days);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MarketError::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    /// # Summary
    /// 抓取分钟线并把所有失败降级为 None。
    ///
    /// # Logic
    /// 1. 调用 `try_fetch`。
    /// 2. 失败时记录 warn 日志并返回 None。
    /// 3. 空序列视为无分钟数据。
    pub async fn fetch(&self, code: &str) -> Option<Vec<MinutePricePoint>> {
        match self.try_fetch(code).await {
            Ok(bars) if bars.is_empty() => {
                debug!("Minute data for {} is empty, falling back to daily only", code);
                None
            }
            Ok(bars) => Some(bars),
            Err(e) => {
                warn!("Minute data fetch for {} failed, falling back to daily only: {}", code, e);
                None
            }
        }
    }
}
