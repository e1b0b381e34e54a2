// -------------------------------------------------------------------------------------------------
//  Shared order/position/market-data state, as seen by the emulation engine.
//
//  The engine never owns orders directly; it reads and mutates them through this trait so the
//  same emulator code runs against a live trading cache or an in-memory test double without
//  change.
// -------------------------------------------------------------------------------------------------

use std::{collections::HashMap, fmt::Debug};

use crate::{
    identifiers::{ClientId, ClientOrderId, ExecSpawnId, InstrumentId, PositionId, StrategyId},
    order::Order,
    types::{Price, Quantity, QuoteTick, TradeTick},
};

/// The subset of cache reads and mutations the emulation engine needs.
pub trait OrderCache: Debug {
    fn order(&self, client_order_id: ClientOrderId) -> Option<&Order>;

    fn order_mut(&mut self, client_order_id: ClientOrderId) -> Option<&mut Order>;

    /// Inserts a brand-new order, overriding any existing entry for its id, and records its
    /// position and routing client if given (used when a contingency leg inherits its primary's
    /// position/client on arming).
    fn add_order(&mut self, order: Order, position_id: Option<PositionId>, client_id: Option<ClientId>);

    /// Overwrites an order already known to the cache, leaving its position/client mappings
    /// untouched.
    fn update_order(&mut self, order: Order);

    /// All orders currently held by an emulation core, across every instrument.
    fn orders_emulated(&self) -> Vec<ClientOrderId>;

    /// Orders still in their as-submitted state, never having reached a matching core — the
    /// set `on_start` reactivates.
    fn orders_initialized(&self) -> Vec<ClientOrderId>;

    fn position_id(&self, client_order_id: ClientOrderId) -> Option<PositionId>;

    /// The routing client assigned to a strategy, if any has been registered.
    fn client_id(&self, strategy_id: StrategyId) -> Option<ClientId>;

    fn instrument_price_increment(&self, instrument_id: InstrumentId) -> Option<Price>;

    /// The price increment used for a synthetic instrument's constituent-derived price.
    fn synthetic_price_increment(&self, instrument_id: InstrumentId) -> Option<Price>;

    /// The total filled quantity across every order sharing an exec-algorithm spawn id.
    fn exec_spawn_total_filled_qty(&self, exec_spawn_id: ExecSpawnId) -> Quantity;

    fn quote(&self, instrument_id: InstrumentId) -> Option<QuoteTick>;

    fn trade(&self, instrument_id: InstrumentId) -> Option<TradeTick>;
}

/// A simple in-memory cache, sufficient for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    orders: HashMap<ClientOrderId, Order>,
    positions: HashMap<ClientOrderId, PositionId>,
    clients: HashMap<StrategyId, ClientId>,
    price_increments: HashMap<InstrumentId, Price>,
    synthetic_price_increments: HashMap<InstrumentId, Price>,
    quotes: HashMap<InstrumentId, QuoteTick>,
    trades: HashMap<InstrumentId, TradeTick>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price_increment(&mut self, instrument_id: InstrumentId, increment: Price) {
        self.price_increments.insert(instrument_id, increment);
    }

    pub fn set_synthetic_price_increment(&mut self, instrument_id: InstrumentId, increment: Price) {
        self.synthetic_price_increments.insert(instrument_id, increment);
    }

    pub fn set_client(&mut self, strategy_id: StrategyId, client_id: ClientId) {
        self.clients.insert(strategy_id, client_id);
    }

    pub fn set_position_id(&mut self, client_order_id: ClientOrderId, position_id: PositionId) {
        self.positions.insert(client_order_id, position_id);
    }

    pub fn set_quote(&mut self, quote: QuoteTick) {
        self.quotes.insert(quote.instrument_id, quote);
    }

    pub fn set_trade(&mut self, trade: TradeTick) {
        self.trades.insert(trade.instrument_id, trade);
    }
}

impl OrderCache for InMemoryCache {
    fn order(&self, client_order_id: ClientOrderId) -> Option<&Order> {
        self.orders.get(&client_order_id)
    }

    fn order_mut(&mut self, client_order_id: ClientOrderId) -> Option<&mut Order> {
        self.orders.get_mut(&client_order_id)
    }

    fn add_order(&mut self, order: Order, position_id: Option<PositionId>, client_id: Option<ClientId>) {
        if let Some(position_id) = position_id {
            self.positions.insert(order.client_order_id, position_id);
        }
        if let Some(client_id) = client_id {
            self.clients.insert(order.strategy_id, client_id);
        }
        self.orders.insert(order.client_order_id, order);
    }

    fn update_order(&mut self, order: Order) {
        self.orders.insert(order.client_order_id, order);
    }

    fn orders_emulated(&self) -> Vec<ClientOrderId> {
        self.orders
            .values()
            .filter(|order| order.status == crate::enums::OrderStatus::Emulated)
            .map(|order| order.client_order_id)
            .collect()
    }

    fn orders_initialized(&self) -> Vec<ClientOrderId> {
        self.orders
            .values()
            .filter(|order| order.status == crate::enums::OrderStatus::Initialized)
            .map(|order| order.client_order_id)
            .collect()
    }

    fn position_id(&self, client_order_id: ClientOrderId) -> Option<PositionId> {
        self.positions.get(&client_order_id).copied()
    }

    fn client_id(&self, strategy_id: StrategyId) -> Option<ClientId> {
        self.clients.get(&strategy_id).copied()
    }

    fn instrument_price_increment(&self, instrument_id: InstrumentId) -> Option<Price> {
        self.price_increments.get(&instrument_id).copied()
    }

    fn synthetic_price_increment(&self, instrument_id: InstrumentId) -> Option<Price> {
        self.synthetic_price_increments.get(&instrument_id).copied()
    }

    fn exec_spawn_total_filled_qty(&self, exec_spawn_id: ExecSpawnId) -> Quantity {
        self.orders
            .values()
            .filter(|order| order.exec_spawn_id == Some(exec_spawn_id))
            .fold(Quantity::zero(0), |acc, order| Quantity {
                raw: acc.raw + order.filled_qty.raw,
                precision: order.filled_qty.precision,
            })
    }

    fn quote(&self, instrument_id: InstrumentId) -> Option<QuoteTick> {
        self.quotes.get(&instrument_id).copied()
    }

    fn trade(&self, instrument_id: InstrumentId) -> Option<TradeTick> {
        self.trades.get(&instrument_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ContingencyType, OrderSide, OrderStatus, OrderType, TimeInForce, TrailingOffsetType, TriggerType};
    use crate::identifiers::{InstrumentId, StrategyId, TraderId};

    fn sample_order(client_order_id: &str) -> Order {
        Order {
            client_order_id: ClientOrderId::from(client_order_id),
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
            status: OrderStatus::Emulated,
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
    fn orders_emulated_filters_by_status() {
        let mut cache = InMemoryCache::new();
        cache.add_order(sample_order("O-1"), None, None);
        let mut released = sample_order("O-2");
        released.status = OrderStatus::Released;
        cache.add_order(released, None, None);

        assert_eq!(cache.orders_emulated(), vec![ClientOrderId::from("O-1")]);
    }

    #[test]
    fn update_order_overwrites_existing() {
        let mut cache = InMemoryCache::new();
        cache.add_order(sample_order("O-1"), None, None);
        let mut updated = sample_order("O-1");
        updated.status = OrderStatus::Canceled;
        cache.update_order(updated);

        assert_eq!(cache.order(ClientOrderId::from("O-1")).unwrap().status, OrderStatus::Canceled);
    }
}
