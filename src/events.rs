// -------------------------------------------------------------------------------------------------
//  Order lifecycle events.
//
//  These are the inbound/outbound event payloads the emulator consumes (fed back from
//  downstream via `on_event`) and produces (published to `events.order.{strategy_id}` and sent
//  to the risk/exec engines). Modeled as a tagged sum type with exhaustive matching everywhere
//  they are dispatched, rather than a trait object, since the set of event kinds is closed and
//  known at compile time.
// -------------------------------------------------------------------------------------------------

use uuid::Uuid;

use crate::{
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId},
    types::{Price, Quantity},
};

/// Emitted when an order starts being held (emulated) inside a matching core.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEmulated {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when an emulated order triggers and is transformed + forwarded downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReleased {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub released_price: Price,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted on initialization of the transformed MARKET/LIMIT order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInitialized {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when an order is canceled (either locally, by the emulator, or upstream).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCanceled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when an order's quantity, leaves, price, or trigger price is amended.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdated {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when an order is filled (partially or fully) on a trading venue.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub last_qty: Quantity,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when an order is rejected by the venue or risk engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRejected {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub client_order_id: ClientOrderId,
    pub reason: String,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Emitted when a GTD order reaches its expiration time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpired {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub event_id: Uuid,
    pub ts_event: u64,
    pub ts_init: u64,
}

/// Any order lifecycle event, exhaustively matched wherever it is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEventAny {
    Emulated(OrderEmulated),
    Initialized(OrderInitialized),
    Released(OrderReleased),
    Canceled(OrderCanceled),
    Updated(OrderUpdated),
    Filled(OrderFilled),
    Rejected(OrderRejected),
    Expired(OrderExpired),
}

impl OrderEventAny {
    #[must_use]
    pub const fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Emulated(e) => e.client_order_id,
            Self::Initialized(e) => e.client_order_id,
            Self::Released(e) => e.client_order_id,
            Self::Canceled(e) => e.client_order_id,
            Self::Updated(e) => e.client_order_id,
            Self::Filled(e) => e.client_order_id,
            Self::Rejected(e) => e.client_order_id,
            Self::Expired(e) => e.client_order_id,
        }
    }

    #[must_use]
    pub const fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Emulated(e) => e.strategy_id,
            Self::Initialized(e) => e.strategy_id,
            Self::Released(e) => e.strategy_id,
            Self::Canceled(e) => e.strategy_id,
            Self::Updated(e) => e.strategy_id,
            Self::Filled(e) => e.strategy_id,
            Self::Rejected(e) => e.strategy_id,
            Self::Expired(e) => e.strategy_id,
        }
    }
}
