// -------------------------------------------------------------------------------------------------
//  Domain enumerations for the order emulation core.
// -------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The side of an order.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    #[default]
    NoOrderSide,
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
            Self::NoOrderSide => Self::NoOrderSide,
        }
    }
}

/// The order type.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    StopLimit,
    MarketIfTouched,
    LimitIfTouched,
    TrailingStopMarket,
    TrailingStopLimit,
}

impl OrderType {
    /// Returns `true` for the two trailing-stop variants.
    #[must_use]
    pub const fn is_trailing_stop(&self) -> bool {
        matches!(self, Self::TrailingStopMarket | Self::TrailingStopLimit)
    }

    /// Returns `true` for order types that carry a `price` and are matched as a limit once
    /// triggered (`STOP_LIMIT`, `LIMIT_IF_TOUCHED`, `TRAILING_STOP_LIMIT`, `LIMIT`).
    #[must_use]
    pub const fn has_limit_price(&self) -> bool {
        matches!(
            self,
            Self::Limit | Self::StopLimit | Self::LimitIfTouched | Self::TrailingStopLimit
        )
    }
}

/// The lifecycle status of an order.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Initialized,
    Emulated,
    Released,
    Submitted,
    Accepted,
    Rejected,
    Canceled,
    Expired,
    Triggered,
    PendingUpdate,
    PendingCancel,
    PartiallyFilled,
    Filled,
    Denied,
}

impl OrderStatus {
    /// Returns `true` if the order is in a closed (terminal) state.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Canceled | Self::Expired | Self::Filled | Self::Denied
        )
    }

    /// Returns `true` if the order is still live on a venue or in the emulator.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.is_closed()
    }
}

/// The price reference the emulator watches to decide when an emulated order triggers.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    #[default]
    NoTrigger,
    Default,
    BidAsk,
    LastPrice,
    MarkPrice,
    IndexPrice,
    LastOrBidAsk,
}

impl TriggerType {
    /// The trigger modes this core can actually emulate; any other trigger type is rejected
    /// at submission time.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::Default | Self::BidAsk | Self::LastPrice)
    }
}

/// How linked orders in a contingency group are coordinated.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyType {
    #[default]
    NoContingency,
    Oco,
    Oto,
    Ouo,
}

/// Time in force for an order, carried through release unchanged.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
    Gtd,
    Day,
}

/// How a trailing stop's offset is denominated.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailingOffsetType {
    #[default]
    NoTrailingOffset,
    Price,
    BasisPoints,
    Ticks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_closed_set() {
        assert!(OrderStatus::Filled.is_closed());
        assert!(OrderStatus::Canceled.is_closed());
        assert!(!OrderStatus::Emulated.is_closed());
        assert!(OrderStatus::Emulated.is_open());
    }

    #[test]
    fn trigger_type_supported_set() {
        assert!(TriggerType::Default.is_supported());
        assert!(TriggerType::BidAsk.is_supported());
        assert!(TriggerType::LastPrice.is_supported());
        assert!(!TriggerType::MarkPrice.is_supported());
        assert!(!TriggerType::NoTrigger.is_supported());
    }

    #[test]
    fn order_type_classification() {
        assert!(OrderType::TrailingStopLimit.is_trailing_stop());
        assert!(!OrderType::StopMarket.is_trailing_stop());
        assert!(OrderType::StopLimit.has_limit_price());
        assert!(!OrderType::StopMarket.has_limit_price());
    }
}
