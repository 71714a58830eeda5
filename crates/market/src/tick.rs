use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use screener_core::market::port::TickRounder;

/// KRX 价格区间与最小价位：(区间上限（不含）, 最小价位)
const KRX_TICK_BANDS: [(Decimal, Decimal); 6] = [
    (dec!(2000), dec!(1)),
    (dec!(5000), dec!(5)),
    (dec!(20000), dec!(10)),
    (dec!(50000), dec!(50)),
    (dec!(200000), dec!(100)),
    (dec!(500000), dec!(500)),
];
const KRX_TOP_TICK: Decimal = dec!(1000);

/// # Summary
/// 韩国交易所 (KOSPI/KOSDAQ 统一) 最小价位取整实现。
///
/// # Invariants
/// - 按价格所在区间的最小价位四舍五入（中点远离零）。
/// - 非正价格原样返回。
#[derive(Debug, Clone, Copy, Default)]
pub struct KrxTickRounder;

impl KrxTickRounder {
    pub fn new() -> Self {
        Self
    }

    /// 获取价格所在区间的最小价位
    pub fn tick_size(price: Decimal) -> Decimal {
        KRX_TICK_BANDS
            .iter()
            .find(|(upper, _)| price < *upper)
            .map(|(_, tick)| *tick)
            .unwrap_or(KRX_TOP_TICK)
    }
}

impl TickRounder for KrxTickRounder {
    fn round_to_tick(&self, price: Decimal) -> Decimal {
        if price <= Decimal::ZERO {
            return price;
        }
        let tick = Self::tick_size(price);
        (price / tick).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * tick
    }
}
