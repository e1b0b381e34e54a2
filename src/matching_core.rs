// -------------------------------------------------------------------------------------------------
//  Per-instrument matching core: tracks the current bid/ask/last prices for one instrument and
//  decides when the orders resting against it should trigger, release, or expire.
//
//  A core never calls back into its owner directly — doing so would need the owner (the order
//  emulator) and the core to hold mutable references to each other, which Rust can't express
//  without a `Rc<RefCell<_>>` indirection. Instead every method that might cause a trigger
//  returns the list of actions the owner should take (`MatchingAction`); the owner applies them
//  with full access to its cache and message bus.
// -------------------------------------------------------------------------------------------------

use crate::{
    enums::{OrderSide, OrderType, TimeInForce, TriggerType},
    error::CoreError,
    identifiers::{ClientOrderId, InstrumentId},
    order::Order,
    types::Price,
};

/// A decision the matching core has made about one of its resident orders; the owner is
/// responsible for carrying it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingAction {
    /// `STOP_MARKET`/`MARKET_IF_TOUCHED`/`TRAILING_STOP_MARKET` has triggered.
    FillMarket(ClientOrderId),
    /// A plain `MARKET`/`LIMIT` order is marketable, or `STOP_LIMIT`/`LIMIT_IF_TOUCHED`/
    /// `TRAILING_STOP_LIMIT` has triggered.
    FillLimit(ClientOrderId),
    /// A `GTD` order's `expire_time_ns` has elapsed.
    Expire(ClientOrderId),
}

/// Holds every order currently emulated against one instrument, plus the prices needed to
/// evaluate their trigger conditions.
#[derive(Debug)]
pub struct MatchingCore {
    pub instrument_id: InstrumentId,
    pub price_increment: Price,
    bid: Option<Price>,
    ask: Option<Price>,
    last: Option<Price>,
    /// Buy-side orders, sorted with the highest trigger/limit price first.
    orders_bid: Vec<Order>,
    /// Sell-side orders, sorted with the lowest trigger/limit price first.
    orders_ask: Vec<Order>,
}

impl MatchingCore {
    #[must_use]
    pub const fn new(instrument_id: InstrumentId, price_increment: Price) -> Self {
        Self {
            instrument_id,
            price_increment,
            bid: None,
            ask: None,
            last: None,
            orders_bid: Vec::new(),
            orders_ask: Vec::new(),
        }
    }

    #[must_use]
    pub const fn bid(&self) -> Option<Price> {
        self.bid
    }

    #[must_use]
    pub const fn ask(&self) -> Option<Price> {
        self.ask
    }

    #[must_use]
    pub const fn last(&self) -> Option<Price> {
        self.last
    }

    #[must_use]
    pub fn orders_bid(&self) -> &[Order] {
        &self.orders_bid
    }

    #[must_use]
    pub fn orders_ask(&self) -> &[Order] {
        &self.orders_ask
    }

    #[must_use]
    pub fn order(&self, client_order_id: ClientOrderId) -> Option<&Order> {
        self.orders_bid
            .iter()
            .chain(self.orders_ask.iter())
            .find(|order| order.client_order_id == client_order_id)
    }

    /// Updates the quote-derived reference prices. Either may be left unchanged by passing `None`.
    pub fn update_quote(&mut self, bid: Price, ask: Price) {
        self.bid = Some(bid);
        self.ask = Some(ask);
    }

    pub fn update_trade(&mut self, price: Price) {
        self.last = Some(price);
    }

    /// Adds a new resident order, keeping its side's vector sorted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateOrder`] if an order with the same id is already resident.
    pub fn add_order(&mut self, order: Order) -> Result<(), CoreError> {
        if self.order(order.client_order_id).is_some() {
            return Err(CoreError::DuplicateOrder(order.client_order_id));
        }
        match order.order_side_specified() {
            OrderSide::Buy => {
                self.orders_bid.push(order);
                Self::sort_bid(&mut self.orders_bid);
            }
            OrderSide::Sell => {
                self.orders_ask.push(order);
                Self::sort_ask(&mut self.orders_ask);
            }
            OrderSide::NoOrderSide => unreachable!("order_side_specified panics on NoOrderSide"),
        }
        Ok(())
    }

    /// Removes and returns a resident order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrderNotFound`] if no order with that id is resident.
    pub fn delete_order(&mut self, client_order_id: ClientOrderId) -> Result<Order, CoreError> {
        if let Some(pos) = self.orders_bid.iter().position(|o| o.client_order_id == client_order_id) {
            return Ok(self.orders_bid.remove(pos));
        }
        if let Some(pos) = self.orders_ask.iter().position(|o| o.client_order_id == client_order_id) {
            return Ok(self.orders_ask.remove(pos));
        }
        Err(CoreError::OrderNotFound(client_order_id))
    }

    /// Replaces a resident order's data in place (used after a quantity/price amendment),
    /// re-sorting its side.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrderNotFound`] if no order with that id is resident.
    pub fn replace_order(&mut self, order: Order) -> Result<(), CoreError> {
        self.delete_order(order.client_order_id)?;
        match order.order_side_specified() {
            OrderSide::Buy => {
                self.orders_bid.push(order);
                Self::sort_bid(&mut self.orders_bid);
            }
            OrderSide::Sell => {
                self.orders_ask.push(order);
                Self::sort_ask(&mut self.orders_ask);
            }
            OrderSide::NoOrderSide => unreachable!("order_side_specified panics on NoOrderSide"),
        }
        Ok(())
    }

    fn sort_bid(orders: &mut [Order]) {
        orders.sort_by(|a, b| Self::sort_key(b).cmp(&Self::sort_key(a)));
    }

    fn sort_ask(orders: &mut [Order]) {
        orders.sort_by(|a, b| Self::sort_key(a).cmp(&Self::sort_key(b)));
    }

    /// The price a resident order is sorted by. Plain `MARKET` orders carry neither a trigger
    /// nor a limit price — they're always marketable, so their position in the sort doesn't
    /// affect when they fire, and a zero key is as good as any other.
    fn sort_key(order: &Order) -> Price {
        order
            .trigger_price
            .or(order.price)
            .unwrap_or_else(|| Price::from_raw(0, order.quantity.precision))
    }

    /// Checks one resident order's trigger/marketability condition against the current prices.
    ///
    /// `initial` marks a check performed synchronously during submission, before the order has
    /// had a chance to rest; it changes nothing about the predicate, only how the caller reacts
    /// to a `None` result (a non-initial check that finds nothing to do is routine; an initial
    /// check that finds nothing to do means the order starts out resting).
    #[must_use]
    pub fn match_order(&self, client_order_id: ClientOrderId, _initial: bool) -> Option<MatchingAction> {
        let order = self.order(client_order_id)?;
        self.evaluate(order)
    }

    /// Sweeps every resident order, returning every action now due. Called after any price
    /// update or clock advance.
    #[must_use]
    pub fn iterate(&self, ts_now: u64) -> Vec<MatchingAction> {
        self.orders_bid
            .iter()
            .chain(self.orders_ask.iter())
            .filter_map(|order| {
                if order.time_in_force == TimeInForce::Gtd {
                    if let Some(expire_time_ns) = order.expire_time_ns {
                        if ts_now >= expire_time_ns {
                            return Some(MatchingAction::Expire(order.client_order_id));
                        }
                    }
                }
                self.evaluate(order)
            })
            .collect()
    }

    fn evaluate(&self, order: &Order) -> Option<MatchingAction> {
        match order.order_type {
            OrderType::Market | OrderType::Limit => {
                if self.is_marketable(order) {
                    Some(MatchingAction::FillLimit(order.client_order_id))
                } else {
                    None
                }
            }
            OrderType::StopMarket | OrderType::MarketIfTouched | OrderType::TrailingStopMarket => {
                if self.is_triggered(order) {
                    Some(MatchingAction::FillMarket(order.client_order_id))
                } else {
                    None
                }
            }
            OrderType::StopLimit | OrderType::LimitIfTouched | OrderType::TrailingStopLimit => {
                if self.is_triggered(order) {
                    Some(MatchingAction::FillLimit(order.client_order_id))
                } else {
                    None
                }
            }
        }
    }

    /// The reference prices `trigger_type` calls for on `side`: `DEFAULT`/`BID_ASK` watch the
    /// bid/ask, `LAST_TRADE` watches the last traded price. Any other (unsupported) trigger
    /// type yields no reference price, so such an order never triggers — submission-time
    /// validation is expected to have already rejected it.
    fn reference_prices(&self, trigger_type: TriggerType, side: OrderSide) -> Vec<Price> {
        match trigger_type {
            TriggerType::Default | TriggerType::BidAsk => match side {
                OrderSide::Buy => self.ask.into_iter().collect(),
                OrderSide::Sell => self.bid.into_iter().collect(),
                OrderSide::NoOrderSide => Vec::new(),
            },
            TriggerType::LastPrice => self.last.into_iter().collect(),
            TriggerType::LastOrBidAsk => {
                let mut prices: Vec<Price> = self.last.into_iter().collect();
                prices.extend(match side {
                    OrderSide::Buy => self.ask,
                    OrderSide::Sell => self.bid,
                    OrderSide::NoOrderSide => None,
                });
                prices
            }
            TriggerType::MarkPrice | TriggerType::IndexPrice | TriggerType::NoTrigger => Vec::new(),
        }
    }

    /// `true` once the reference price has moved to or past `trigger_price` in the triggering
    /// direction for `order`'s side (up for BUY, down for SELL). Shared by every triggered
    /// order type — `STOP_*` and `*_IF_TOUCHED` use the identical predicate.
    fn is_triggered(&self, order: &Order) -> bool {
        let Some(trigger_price) = order.trigger_price else {
            return false;
        };
        let side = order.order_side_specified();
        self.reference_prices(order.emulation_trigger, side).into_iter().any(|price| match side {
            OrderSide::Buy => price >= trigger_price,
            OrderSide::Sell => price <= trigger_price,
            OrderSide::NoOrderSide => false,
        })
    }

    fn is_marketable(&self, order: &Order) -> bool {
        if order.order_type == OrderType::Market {
            return true;
        }
        let Some(price) = order.price else {
            return false;
        };
        match order.order_side_specified() {
            OrderSide::Buy => self.ask.is_some_and(|ask| ask <= price),
            OrderSide::Sell => self.bid.is_some_and(|bid| bid >= price),
            OrderSide::NoOrderSide => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::enums::{ContingencyType, OrderStatus, TrailingOffsetType};
    use crate::identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId};
    use crate::types::Quantity;

    fn stop_order(client_order_id: &str, side: OrderSide, trigger_price: &str, trigger_type: TriggerType) -> Order {
        Order {
            client_order_id: ClientOrderId::from(client_order_id),
            trader_id: TraderId::from("TRADER-001"),
            strategy_id: StrategyId::from("S-001"),
            instrument_id: InstrumentId::from("AAPL.XNAS"),
            trigger_instrument_id: None,
            side,
            order_type: OrderType::StopMarket,
            quantity: Quantity::from("10"),
            filled_qty: Quantity::zero(0),
            price: None,
            trigger_price: Some(Price::from(trigger_price)),
            activation_price: None,
            trailing_offset: None,
            limit_offset: None,
            trailing_offset_type: TrailingOffsetType::NoTrailingOffset,
            status: OrderStatus::Emulated,
            emulation_trigger: trigger_type,
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

    fn core() -> MatchingCore {
        MatchingCore::new(InstrumentId::from("AAPL.XNAS"), Price::new(0.01, 2))
    }

    #[rstest]
    #[case(OrderSide::Buy, "100.00", "102.00", "101.00", true)]
    #[case(OrderSide::Buy, "100.00", "100.50", "101.00", false)]
    #[case(OrderSide::Sell, "98.00", "100.00", "99.00", true)]
    #[case(OrderSide::Sell, "99.50", "100.00", "99.00", false)]
    fn stop_buy_ask_trigger(
        #[case] side: OrderSide,
        #[case] bid: &str,
        #[case] ask: &str,
        #[case] trigger_price: &str,
        #[case] expected_triggered: bool,
    ) {
        let mut core = core();
        core.update_quote(Price::from(bid), Price::from(ask));
        let order = stop_order("O-1", side, trigger_price, TriggerType::BidAsk);
        core.add_order(order).unwrap();

        let result = core.match_order(ClientOrderId::from("O-1"), true);
        assert_eq!(result.is_some(), expected_triggered);
    }

    #[test]
    fn add_order_rejects_duplicate() {
        let mut core = core();
        let order = stop_order("O-1", OrderSide::Buy, "101.00", TriggerType::BidAsk);
        core.add_order(order.clone()).unwrap();
        assert_eq!(core.add_order(order).unwrap_err(), CoreError::DuplicateOrder(ClientOrderId::from("O-1")));
    }

    #[test]
    fn delete_order_missing_errors() {
        let mut core = core();
        assert_eq!(
            core.delete_order(ClientOrderId::from("MISSING")).unwrap_err(),
            CoreError::OrderNotFound(ClientOrderId::from("MISSING"))
        );
    }

    #[test]
    fn orders_bid_sorted_descending() {
        let mut core = core();
        core.add_order(stop_order("O-1", OrderSide::Buy, "100.00", TriggerType::BidAsk)).unwrap();
        core.add_order(stop_order("O-2", OrderSide::Buy, "102.00", TriggerType::BidAsk)).unwrap();
        core.add_order(stop_order("O-3", OrderSide::Buy, "101.00", TriggerType::BidAsk)).unwrap();

        let prices: Vec<Price> = core.orders_bid().iter().map(|o| o.trigger_price.unwrap()).collect();
        assert_eq!(prices, vec![Price::from("102.00"), Price::from("101.00"), Price::from("100.00")]);
    }

    #[test]
    fn orders_ask_sorted_ascending() {
        let mut core = core();
        core.add_order(stop_order("O-1", OrderSide::Sell, "100.00", TriggerType::BidAsk)).unwrap();
        core.add_order(stop_order("O-2", OrderSide::Sell, "98.00", TriggerType::BidAsk)).unwrap();
        core.add_order(stop_order("O-3", OrderSide::Sell, "99.00", TriggerType::BidAsk)).unwrap();

        let prices: Vec<Price> = core.orders_ask().iter().map(|o| o.trigger_price.unwrap()).collect();
        assert_eq!(prices, vec![Price::from("98.00"), Price::from("99.00"), Price::from("100.00")]);
    }

    #[test]
    fn gtd_order_expires_via_iterate() {
        let mut core = core();
        let mut order = stop_order("O-1", OrderSide::Buy, "200.00", TriggerType::BidAsk);
        order.time_in_force = TimeInForce::Gtd;
        order.expire_time_ns = Some(1_000);
        core.add_order(order).unwrap();

        assert!(core.iterate(500).is_empty());
        assert_eq!(core.iterate(1_500), vec![MatchingAction::Expire(ClientOrderId::from("O-1"))]);
    }

    #[test]
    fn last_or_bid_ask_triggers_on_either() {
        let mut core = core();
        core.update_trade(Price::from("101.50"));
        let order = stop_order("O-1", OrderSide::Buy, "101.00", TriggerType::LastOrBidAsk);
        core.add_order(order).unwrap();

        assert_eq!(
            core.match_order(ClientOrderId::from("O-1"), false),
            Some(MatchingAction::FillMarket(ClientOrderId::from("O-1")))
        );
    }

    #[test]
    fn market_if_touched_buy_triggers_like_stop() {
        let mut core = core();
        core.update_quote(Price::from("99.00"), Price::from("101.50"));
        let mut order = stop_order("O-1", OrderSide::Buy, "101.00", TriggerType::BidAsk);
        order.order_type = OrderType::MarketIfTouched;
        core.add_order(order).unwrap();

        assert_eq!(
            core.match_order(ClientOrderId::from("O-1"), false),
            Some(MatchingAction::FillMarket(ClientOrderId::from("O-1")))
        );
    }

    #[test]
    fn stop_limit_triggers_dispatch_to_fill_limit() {
        let mut core = core();
        core.update_quote(Price::from("99.00"), Price::from("101.50"));
        let mut order = stop_order("O-1", OrderSide::Buy, "101.00", TriggerType::BidAsk);
        order.order_type = OrderType::StopLimit;
        order.price = Some(Price::from("101.20"));
        core.add_order(order).unwrap();

        assert_eq!(
            core.match_order(ClientOrderId::from("O-1"), false),
            Some(MatchingAction::FillLimit(ClientOrderId::from("O-1")))
        );
    }

    #[test]
    fn plain_market_order_is_always_marketable() {
        let mut core = core();
        let mut order = stop_order("O-1", OrderSide::Buy, "101.00", TriggerType::BidAsk);
        order.order_type = OrderType::Market;
        order.trigger_price = None;
        core.add_order(order).unwrap();

        assert_eq!(
            core.match_order(ClientOrderId::from("O-1"), true),
            Some(MatchingAction::FillLimit(ClientOrderId::from("O-1")))
        );
    }
}
