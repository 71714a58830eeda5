use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::RwLock;

/// 韩国交易所所在时区 (UTC+9) 的秒级偏移
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// # Summary
/// 时间供给器接口，用于隔离物理系统时钟。
/// 引擎本身只接收显式的分析日期，只有调用方通过此接口决定“今天”是哪一天。
pub trait TimeProvider: Send + Sync {
    /// 获取当前挂载的时间
    fn now(&self) -> DateTime<Utc>;

    /// # Summary
    /// 获取交易所本地时区下的当前日期。
    ///
    /// # Logic
    /// 1. 读取 `now()`。
    /// 2. 转换为 UTC+9 后取日期部分。
    fn today(&self) -> NaiveDate {
        exchange_date(self.now())
    }
}

/// # Summary
/// 将 UTC 时间换算为交易所本地 (UTC+9) 的日历日期。
///
/// # Invariants
/// - 分析日期与新闻日龄都以此日期为准，避免混用 UTC 与 KST 日历。
pub fn exchange_date(at: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at.with_timezone(&kst).date_naive(),
        None => at.date_naive(),
    }
}

/// # Summary
/// 针对实盘和普通运行的真实时钟，直接返回操作系统当前时间。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 测试与复盘专用的冻结时钟，允许调用方主动拨动时间。
///
/// # Invariants
/// - 并发安全：内部利用 `RwLock` 提供多线程安全的读写。
pub struct FakeClockProvider {
    current_time: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    /// 使用指定的初始时间创建冻结时钟
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// 强制修改时钟的当前时间
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        let mut time = self.current_time.write().unwrap_or_else(|e| e.into_inner());
        *time = new_time;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.read().unwrap_or_else(|e| e.into_inner())
    }
}
