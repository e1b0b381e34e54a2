// -------------------------------------------------------------------------------------------------
//  The order domain object: the unit the matching core, contingency coordinator, and emulator
//  all operate on. Orders are conceptually owned by an external cache (see `crate::cache`); this
//  type is the value that crosses that boundary, not a reference into cache-owned storage.
// -------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    enums::{ContingencyType, OrderSide, OrderStatus, OrderType, TimeInForce, TrailingOffsetType, TriggerType},
    events::OrderEventAny,
    identifiers::{ClientOrderId, ExecAlgorithmId, ExecSpawnId, InstrumentId, StrategyId, TraderId},
    types::{Price, Quantity},
};

/// An order, emulated or plain.
///
/// There is deliberately no order-type-specific struct hierarchy (`LimitOrder`,
/// `StopMarketOrder`, ...) — `order_type` is a flat enum and the optional fields (`price`,
/// `trigger_price`, trailing parameters) are simply unset for order types that don't use them.
/// See `DESIGN.md` for the rationale.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub client_order_id: ClientOrderId,
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub trigger_instrument_id: Option<InstrumentId>,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub filled_qty: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub activation_price: Option<Price>,
    pub trailing_offset: Option<Decimal>,
    pub limit_offset: Option<Decimal>,
    pub trailing_offset_type: TrailingOffsetType,
    pub status: OrderStatus,
    pub emulation_trigger: TriggerType,
    pub time_in_force: TimeInForce,
    pub expire_time_ns: Option<u64>,
    pub contingency_type: ContingencyType,
    pub linked_order_ids: Vec<ClientOrderId>,
    pub parent_order_id: Option<ClientOrderId>,
    pub exec_algorithm_id: Option<ExecAlgorithmId>,
    pub exec_spawn_id: Option<ExecSpawnId>,
    pub ts_init: u64,
    pub events: Vec<OrderEventAny>,
}

impl Order {
    /// Returns the side, panicking on `NoOrderSide`.
    ///
    /// # Panics
    ///
    /// Panics if `side` is `NoOrderSide` — a matching core must never hold an order without a
    /// concrete side; this is a programming-error invariant (`InvalidOrderSide`).
    #[must_use]
    pub fn order_side_specified(&self) -> OrderSide {
        match self.side {
            OrderSide::Buy | OrderSide::Sell => self.side,
            OrderSide::NoOrderSide => panic!("invalid `OrderSide::NoOrderSide` on a resting order"),
        }
    }

    #[must_use]
    pub fn leaves_qty(&self) -> Quantity {
        Quantity {
            raw: self.quantity.raw - self.filled_qty.raw,
            precision: self.quantity.precision,
        }
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }

    #[must_use]
    pub const fn is_pending_cancel(&self) -> bool {
        matches!(self.status, OrderStatus::PendingCancel)
    }

    /// The price used to dispatch MARKET/LIMIT orders to `fill_limit` (plain limit price) or
    /// STOP_LIMIT/LIMIT_IF_TOUCHED/TRAILING_STOP_LIMIT once triggered.
    #[must_use]
    pub const fn limit_price(&self) -> Option<Price> {
        self.price
    }

    /// The trigger/resting instrument the matching core keys its price state by.
    #[must_use]
    pub fn trigger_instrument_id(&self) -> InstrumentId {
        self.trigger_instrument_id.unwrap_or(self.instrument_id)
    }

    /// Applies an event to this order, updating its status and amendable fields.
    ///
    /// Matches over a flat event enum rather than pulling in a finite-state-machine crate —
    /// the set of legal transitions here is small enough not to warrant one.
    pub fn apply(&mut self, event: OrderEventAny) {
        match &event {
            OrderEventAny::Emulated(_) => self.status = OrderStatus::Emulated,
            OrderEventAny::Initialized(_) => self.status = OrderStatus::Initialized,
            OrderEventAny::Released(_) => self.status = OrderStatus::Released,
            OrderEventAny::Canceled(_) => self.status = OrderStatus::Canceled,
            OrderEventAny::Expired(_) => self.status = OrderStatus::Expired,
            OrderEventAny::Rejected(_) => self.status = OrderStatus::Rejected,
            OrderEventAny::Filled(filled) => {
                self.filled_qty = Quantity {
                    raw: self.filled_qty.raw + filled.last_qty.raw,
                    precision: self.filled_qty.precision,
                };
                self.status = if self.leaves_qty().is_zero() {
                    OrderStatus::Filled
                } else {
                    OrderStatus::PartiallyFilled
                };
            }
            OrderEventAny::Updated(updated) => {
                self.quantity = updated.quantity;
                if let Some(price) = updated.price {
                    self.price = Some(price);
                }
                if let Some(trigger_price) = updated.trigger_price {
                    self.trigger_price = Some(trigger_price);
                }
            }
        }
        self.events.push(event);
    }

    /// Rewrites this order into a plain `MARKET` order, clearing emulation and preserving
    /// identity (client_order_id, strategy_id, quantities).
    #[must_use]
    pub fn transform_to_market(&self, ts_now: u64) -> Self {
        let mut transformed = self.clone();
        transformed.emulation_trigger = TriggerType::NoTrigger;
        transformed.order_type = OrderType::Market;
        transformed.trigger_price = None;
        transformed.ts_init = ts_now;
        transformed
    }

    /// Rewrites this order into a plain `LIMIT` order at its existing `price`, clearing
    /// emulation and preserving identity.
    ///
    /// # Panics
    ///
    /// Panics if the order has no `price` set (a logic error: only orders that carry a limit
    /// price reach the limit-release path).
    #[must_use]
    pub fn transform_to_limit(&self, ts_now: u64) -> Self {
        assert!(self.price.is_some(), "cannot release to LIMIT with no price");
        let mut transformed = self.clone();
        transformed.emulation_trigger = TriggerType::NoTrigger;
        transformed.order_type = OrderType::Limit;
        transformed.trigger_price = None;
        transformed.ts_init = ts_now;
        transformed
    }
}

/// Builds a unique event id.
#[must_use]
pub fn new_event_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_order() -> Order {
        Order {
            client_order_id: ClientOrderId::from("O-1"),
            trader_id: TraderId::from("TRADER-001"),
            strategy_id: StrategyId::from("S-001"),
            instrument_id: InstrumentId::from("AAPL.XNAS"),
            trigger_instrument_id: None,
            side: OrderSide::Buy,
            order_type: OrderType::StopMarket,
            quantity: Quantity::from("1"),
            filled_qty: Quantity::zero(0),
            price: None,
            trigger_price: Some(Price::from("101.00")),
            activation_price: None,
            trailing_offset: None,
            limit_offset: None,
            trailing_offset_type: TrailingOffsetType::NoTrailingOffset,
            status: OrderStatus::Initialized,
            emulation_trigger: TriggerType::BidAsk,
            time_in_force: TimeInForce::Gtc,
            expire_time_ns: None,
            contingency_type: ContingencyType::NoContingency,
            linked_order_ids: Vec::new(),
            parent_order_id: None,
            exec_algorithm_id: None,
            exec_spawn_id: None,
            ts_init: 0,
            events: Vec::new(),
        }
    }

    #[test]
    fn transform_to_market_clears_trigger_and_preserves_identity() {
        let order = base_order();
        let transformed = order.transform_to_market(42);
        assert_eq!(transformed.client_order_id, order.client_order_id);
        assert_eq!(transformed.strategy_id, order.strategy_id);
        assert_eq!(transformed.quantity, order.quantity);
        assert_eq!(transformed.emulation_trigger, TriggerType::NoTrigger);
        assert_eq!(transformed.order_type, OrderType::Market);
        assert_eq!(transformed.ts_init, 42);
    }

    #[test]
    #[should_panic(expected = "cannot release to LIMIT with no price")]
    fn transform_to_limit_without_price_panics() {
        let order = base_order();
        let _ = order.transform_to_limit(1);
    }

    #[test]
    fn leaves_qty_tracks_fills() {
        let mut order = base_order();
        order.quantity = Quantity::from("10");
        order.filled_qty = Quantity::from("4");
        assert_eq!(order.leaves_qty(), Quantity::from("6"));
    }
}
