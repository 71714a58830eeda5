use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use screener_core::market::entity::Bar;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: Decimal = dec!(2.0);

/// # Summary
/// 布林带快照。
///
/// # Invariants
/// - `position` 位于 [0, 1]；带宽为 0 时退化为 0.5。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BollingerBands {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
    pub width: Decimal,
    pub position: Decimal,
}

/// 价格在布林带中的区位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandZone {
    NearLower,
    Lower,
    Middle,
    Upper,
    NearUpper,
}

impl BollingerBands {
    pub fn zone(&self) -> BandZone {
        if self.position <= dec!(0.2) {
            BandZone::NearLower
        } else if self.position <= dec!(0.4) {
            BandZone::Lower
        } else if self.position <= dec!(0.6) {
            BandZone::Middle
        } else if self.position < dec!(0.8) {
            BandZone::Upper
        } else {
            BandZone::NearUpper
        }
    }

    /// # Summary
    /// 支撑位评分 (0–6)：越接近下轨支撑越高，贴近上轨为 0。
    pub fn position_score(&self) -> Decimal {
        match self.zone() {
            BandZone::NearLower => dec!(6),
            BandZone::Lower => dec!(5),
            BandZone::Middle => dec!(4),
            BandZone::Upper => dec!(2),
            BandZone::NearUpper => Decimal::ZERO,
        }
    }
}

/// # Summary
/// 布林带：均值 ± k 倍（总体）标准差。
///
/// # Logic
/// 1. 取最近 `period` 根收盘价计算均值与总体方差。
/// 2. 上下轨为均值 ± k·σ，`position = (close - lower) / width` 并截断到 [0, 1]。
///
/// # Returns
/// 数据不足时返回 None。
pub fn bollinger<B: Bar>(series: &[B], period: usize, k: Decimal) -> Option<BollingerBands> {
    if period == 0 || series.len() < period {
        return None;
    }
    let window = &series[series.len() - period..];
    let n = Decimal::from(period);
    let middle = window.iter().map(Bar::close).sum::<Decimal>() / n;
    let variance = window
        .iter()
        .map(|b| {
            let d = b.close() - middle;
            d * d
        })
        .sum::<Decimal>()
        / n;
    let std_dev = variance.sqrt()?;

    let upper = middle + k * std_dev;
    let lower = middle - k * std_dev;
    let width = upper - lower;
    let close = window[period - 1].close();
    let position = if width.is_zero() {
        dec!(0.5)
    } else {
        ((close - lower) / width).clamp(Decimal::ZERO, Decimal::ONE)
    };

    Some(BollingerBands {
        upper,
        middle,
        lower,
        width,
        position,
    })
}
