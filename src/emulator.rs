// -------------------------------------------------------------------------------------------------
//  The order emulator: holds STOP/LIMIT-IF-TOUCHED/TRAILING orders locally, watches market data
//  for their trigger condition, and releases them downstream as plain MARKET/LIMIT orders once it
//  fires. Also the home of contingency-group coordination (OTO/OCO/OUO), since releasing and
//  canceling linked orders touches the same matching-core/cache/msgbus state.
// -------------------------------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::{
    cache::OrderCache,
    clock::Clock,
    contingency::{self, ContingencyAction},
    enums::{OrderSide, OrderType, TriggerType},
    events::{OrderCanceled, OrderEmulated, OrderEventAny, OrderExpired, OrderInitialized, OrderReleased},
    identifiers::{ClientOrderId, InstrumentId},
    matching_core::{MatchingAction, MatchingCore},
    messages::{order_to_submit_order, CancelAllOrders, CancelOrder, ModifyOrder, SubmitOrder, TradingCommand},
    msgbus::MessageBus,
    order::{new_event_id, Order},
    trailing::trailing_stop_calculate,
    types::{Price, QuoteTick, TradeTick},
};

const RECV: &str = "<--";
const CMD: &str = "CMD";
const EVT: &str = "EVT";

/// Coordinates emulated orders against market data, releasing them to execution once triggered.
///
/// Generic over its collaborators rather than holding `Rc<RefCell<dyn Trait>>` handles: nothing
/// here needs shared mutable ownership with another component, unlike the per-instrument
/// [`MatchingCore`] (see its module docs for why that one *can't* hold a back-pointer to this
/// struct).
pub struct OrderEmulator<C, B, K> {
    cache: C,
    msgbus: B,
    clock: K,
    matching_cores: HashMap<InstrumentId, MatchingCore>,
    submit_order_commands: HashMap<ClientOrderId, SubmitOrder>,
    subscribed_quotes: HashSet<InstrumentId>,
    subscribed_trades: HashSet<InstrumentId>,
}

impl<C, B, K> std::fmt::Debug for OrderEmulator<C, B, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(OrderEmulator))
            .field("matching_cores", &self.matching_cores.len())
            .field("pending_commands", &self.submit_order_commands.len())
            .field("subscribed_quotes", &self.subscribed_quotes.len())
            .field("subscribed_trades", &self.subscribed_trades.len())
            .finish()
    }
}

impl<C, B, K> OrderEmulator<C, B, K>
where
    C: OrderCache,
    B: MessageBus,
    K: Clock,
{
    pub fn new(cache: C, msgbus: B, clock: K) -> Self {
        Self {
            cache,
            msgbus,
            clock,
            matching_cores: HashMap::new(),
            submit_order_commands: HashMap::new(),
            subscribed_quotes: HashSet::new(),
            subscribed_trades: HashSet::new(),
        }
    }

    #[must_use]
    pub fn matching_core(&self, instrument_id: InstrumentId) -> Option<&MatchingCore> {
        self.matching_cores.get(&instrument_id)
    }

    #[must_use]
    pub fn submit_order_commands(&self) -> &HashMap<ClientOrderId, SubmitOrder> {
        &self.submit_order_commands
    }

    #[must_use]
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    #[must_use]
    pub const fn msgbus(&self) -> &B {
        &self.msgbus
    }

    /// Reactivates orders left `INITIALIZED` in the cache (a restart mid-submission), resubmitting
    /// each through the normal command path.
    pub fn on_start(&mut self) {
        let pending = self.cache.orders_initialized();
        if pending.is_empty() {
            log::info!("No emulated orders to reactivate");
            return;
        }
        for client_order_id in pending {
            let Some(order) = self.cache.order(client_order_id) else { continue };
            if order.emulation_trigger == TriggerType::NoTrigger {
                continue;
            }
            let position_id = self.cache.position_id(client_order_id);
            let client_id = self.cache.client_id(order.strategy_id);
            let command = order_to_submit_order(order);
            log::info!("Reactivating {client_order_id}");
            self.handle_submit_order(command, position_id, client_id);
        }
    }

    /// Clears every matching core and pending command, returning the emulator to a blank state.
    pub fn on_reset(&mut self) {
        self.matching_cores.clear();
        self.submit_order_commands.clear();
    }

    pub fn execute(&mut self, command: TradingCommand) {
        log::info!("{RECV}{CMD} {command:?}");
        match command {
            TradingCommand::SubmitOrder(command) => self.handle_submit_order(command, None, None),
            TradingCommand::ModifyOrder(command) => self.handle_modify_order(command),
            TradingCommand::CancelOrder(command) => self.handle_cancel_order(command),
            TradingCommand::CancelAllOrders(command) => self.handle_cancel_all_orders(command),
        }
    }

    /// Feeds an inbound lifecycle event from downstream (risk/exec) back through contingency
    /// coordination, then drops any now-closed order out of its matching core.
    pub fn on_event(&mut self, event: OrderEventAny) {
        log::info!("{RECV}{EVT} {event:?}");

        let actions = contingency::handle_event(&self.cache, &self.submit_order_commands, &event);
        self.apply_contingency_actions(actions);

        let client_order_id = event.client_order_id();
        if let Some(order) = self.cache.order(client_order_id) {
            if order.is_closed() {
                let trigger_instrument_id = order.trigger_instrument_id();
                if let Some(core) = self.matching_cores.get_mut(&trigger_instrument_id) {
                    let _ = core.delete_order(client_order_id);
                }
            }
        } else {
            log::warn!("Cannot handle order event: {client_order_id} not found in cache");
        }
    }

    fn apply_contingency_actions(&mut self, actions: Vec<ContingencyAction>) {
        for action in actions {
            match action {
                ContingencyAction::Submit(command) => self.handle_submit_order(command, None, None),
                ContingencyAction::CancelLocally(client_order_id) => self.cancel_order_locally(client_order_id),
                ContingencyAction::UpdateQuantity(client_order_id, quantity) => {
                    if let Some(order) = self.cache.order(client_order_id) {
                        let mut order = order.clone();
                        order.quantity = quantity;
                        let ts_now = self.clock.timestamp_ns();
                        let event = OrderEventAny::Updated(crate::events::OrderUpdated {
                            trader_id: order.trader_id,
                            strategy_id: order.strategy_id,
                            instrument_id: order.instrument_id,
                            client_order_id,
                            quantity,
                            price: None,
                            trigger_price: None,
                            event_id: new_event_id(),
                            ts_event: ts_now,
                            ts_init: ts_now,
                        });
                        order.apply(event.clone());
                        self.cache.update_order(order.clone());
                        self.msgbus.publish_event(event);
                        self.resort_after_amend(&order);
                    }
                }
            }
        }
    }

    fn handle_submit_order(
        &mut self,
        command: SubmitOrder,
        position_id: Option<crate::identifiers::PositionId>,
        client_id: Option<crate::identifiers::ClientId>,
    ) {
        let mut order = command.to_order();
        assert_ne!(
            order.emulation_trigger,
            TriggerType::NoTrigger,
            "a command reaching the emulator must carry a real emulation_trigger"
        );

        if !order.emulation_trigger.is_supported() {
            log::error!("Cannot emulate order: trigger type {:?} not supported", order.emulation_trigger);
            self.reject_as_canceled(order, position_id, client_id);
            return;
        }

        let trigger_instrument_id = order.trigger_instrument_id();
        if !self.matching_cores.contains_key(&trigger_instrument_id) {
            let Some(price_increment) = self
                .cache
                .instrument_price_increment(trigger_instrument_id)
                .or_else(|| self.cache.synthetic_price_increment(trigger_instrument_id))
            else {
                log::error!("Cannot emulate order: no instrument {trigger_instrument_id} for trigger");
                self.reject_as_canceled(order, position_id, client_id);
                return;
            };
            log::info!("Creating matching core for {trigger_instrument_id}");
            self.matching_cores
                .insert(trigger_instrument_id, MatchingCore::new(trigger_instrument_id, price_increment));
        }

        if order.order_type.is_trailing_stop() {
            self.seed_trailing_stop(&mut order);
            if order.trigger_price.is_none() {
                log::error!("Cannot handle trailing stop order with no trigger_price and no market updates");
                self.reject_as_canceled(order, position_id, client_id);
                return;
            }
        }

        self.submit_order_commands.insert(order.client_order_id, command);

        // The order must be resident in the core before `match_order` looks it up — an initial
        // check against an order that isn't there yet would never see it as marketable.
        let core = self.matching_cores.get_mut(&trigger_instrument_id).expect("just inserted");
        if let Err(e) = core.add_order(order.clone()) {
            log::error!("Cannot add order: {e}");
            self.submit_order_commands.remove(&order.client_order_id);
            return;
        }

        match order.emulation_trigger {
            TriggerType::Default | TriggerType::BidAsk => {
                if self.subscribed_quotes.insert(trigger_instrument_id) {
                    self.msgbus.subscribe_quotes(trigger_instrument_id);
                }
            }
            TriggerType::LastPrice => {
                if self.subscribed_trades.insert(trigger_instrument_id) {
                    self.msgbus.subscribe_trades(trigger_instrument_id);
                }
            }
            TriggerType::MarkPrice | TriggerType::IndexPrice | TriggerType::LastOrBidAsk | TriggerType::NoTrigger => {
                unreachable!("rejected above by is_supported")
            }
        }

        let core = self.matching_cores.get(&trigger_instrument_id).expect("just inserted");
        let initial_action = core.match_order(order.client_order_id, true);

        if let Some(action) = initial_action {
            // Already marketable (plain MARKET/LIMIT) or triggered (STOP/LIT) at submission:
            // release it straight away. `release`/`expire` pop the order back out of the core
            // and the pending command, so no `OrderEmulated` is ever observed for it.
            self.apply_matching_action(trigger_instrument_id, action);
            return;
        }

        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Emulated(OrderEmulated {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.add_order(order.clone(), position_id, client_id);
        self.msgbus.send_risk_submit_order(self.submit_order_commands[&order.client_order_id].clone());
        self.msgbus.publish_event(event);

        log::info!("Emulating {}", order.client_order_id);
    }

    fn handle_modify_order(&mut self, command: ModifyOrder) {
        let Some(existing) = self.cache.order(command.client_order_id) else {
            log::error!("Cannot modify order: {} not found", command.client_order_id);
            return;
        };
        let mut order = existing.clone();

        let price = command.price.or(order.price);
        let trigger_price = command.trigger_price.or(order.trigger_price);
        let quantity = command.quantity.unwrap_or(order.quantity);

        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Updated(crate::events::OrderUpdated {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            quantity,
            price,
            trigger_price,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.update_order(order.clone());
        self.msgbus.send_exec_modify_order(command);
        self.msgbus.publish_event(event);

        let trigger_instrument_id = order.trigger_instrument_id();
        self.resort_after_amend(&order);

        let Some(core) = self.matching_cores.get(&trigger_instrument_id) else {
            log::error!("Cannot handle modify: no matching core for trigger instrument {trigger_instrument_id}");
            return;
        };
        if let Some(action) = core.match_order(order.client_order_id, false) {
            self.apply_matching_action(trigger_instrument_id, action);
        }
    }

    /// Re-sorts an order's matching-core position after its price/trigger price changed.
    fn resort_after_amend(&mut self, order: &Order) {
        let trigger_instrument_id = order.trigger_instrument_id();
        if let Some(core) = self.matching_cores.get_mut(&trigger_instrument_id) {
            if core.order(order.client_order_id).is_some() {
                let _ = core.replace_order(order.clone());
            }
        }
    }

    fn handle_cancel_order(&mut self, command: CancelOrder) {
        let Some(order) = self.cache.order(command.client_order_id) else {
            log::error!("Cannot cancel order: {} not found", command.client_order_id);
            return;
        };
        let trigger_instrument_id = order.trigger_instrument_id();
        let held_locally = self
            .matching_cores
            .get(&trigger_instrument_id)
            .is_some_and(|core| core.order(command.client_order_id).is_some());

        if !held_locally && order.is_open() && !order.is_pending_cancel() {
            self.msgbus.send_exec_cancel_order(command);
        } else {
            self.cancel_order_locally(command.client_order_id);
        }
    }

    fn handle_cancel_all_orders(&mut self, command: CancelAllOrders) {
        let Some(core) = self.matching_cores.get(&command.instrument_id) else { return };
        let client_order_ids: Vec<ClientOrderId> = match command.order_side {
            OrderSide::NoOrderSide => core
                .orders_bid()
                .iter()
                .chain(core.orders_ask().iter())
                .map(|o| o.client_order_id)
                .collect(),
            OrderSide::Buy => core.orders_bid().iter().map(|o| o.client_order_id).collect(),
            OrderSide::Sell => core.orders_ask().iter().map(|o| o.client_order_id).collect(),
        };
        for client_order_id in client_order_ids {
            self.cancel_order_locally(client_order_id);
        }
    }

    /// Rejects a just-submitted order that never made it into a matching core (unsupported
    /// trigger type, unresolvable trigger instrument, or a trailing stop with nowhere to seed
    /// its initial price from): records it in the cache as closed and emits `OrderCanceled`
    /// without ever creating or touching a matching core.
    fn reject_as_canceled(
        &mut self,
        mut order: Order,
        position_id: Option<crate::identifiers::PositionId>,
        client_id: Option<crate::identifiers::ClientId>,
    ) {
        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Canceled(OrderCanceled {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.add_order(order, position_id, client_id);
        self.msgbus.publish_event(event);
    }

    /// Cancels a locally held order: drops its command, removes it from its matching core, emits
    /// `OrderCanceled`.
    fn cancel_order_locally(&mut self, client_order_id: ClientOrderId) {
        let Some(order) = self.cache.order(client_order_id) else { return };
        if order.is_closed() {
            log::warn!("Cannot cancel order: already closed");
            return;
        }
        let mut order = order.clone();
        log::info!("Canceling order {client_order_id}");

        self.submit_order_commands.remove(&client_order_id);
        let trigger_instrument_id = order.trigger_instrument_id();
        if let Some(core) = self.matching_cores.get_mut(&trigger_instrument_id) {
            let _ = core.delete_order(client_order_id);
        }

        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Canceled(OrderCanceled {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.update_order(order);
        self.msgbus.publish_event(event);
    }

    pub fn on_quote_tick(&mut self, quote: QuoteTick) {
        let Some(core) = self.matching_cores.get_mut(&quote.instrument_id) else {
            log::error!("Cannot handle quote tick: no matching core for instrument {}", quote.instrument_id);
            return;
        };
        core.update_quote(quote.bid_price, quote.ask_price);
        self.iterate_core(quote.instrument_id);
    }

    pub fn on_trade_tick(&mut self, trade: TradeTick) {
        let Some(core) = self.matching_cores.get_mut(&trade.instrument_id) else {
            log::error!("Cannot handle trade tick: no matching core for instrument {}", trade.instrument_id);
            return;
        };
        core.update_trade(trade.price);
        if !self.subscribed_quotes.contains(&trade.instrument_id) {
            core.update_quote(trade.price, trade.price);
        }
        self.iterate_core(trade.instrument_id);
    }

    fn iterate_core(&mut self, instrument_id: InstrumentId) {
        let ts_now = self.clock.timestamp_ns();
        let Some(core) = self.matching_cores.get(&instrument_id) else { return };
        let actions = core.iterate(ts_now);
        for action in actions {
            self.apply_matching_action(instrument_id, action);
        }

        let resting: Vec<Order> = match self.matching_cores.get(&instrument_id) {
            Some(core) => core.orders_bid().iter().chain(core.orders_ask().iter()).cloned().collect(),
            None => Vec::new(),
        };
        for mut order in resting {
            if order.order_type.is_trailing_stop() {
                self.recompute_trailing_stop(&mut order);
            }
        }
    }

    fn apply_matching_action(&mut self, trigger_instrument_id: InstrumentId, action: MatchingAction) {
        match action {
            MatchingAction::FillMarket(client_order_id) => self.release(trigger_instrument_id, client_order_id, true),
            MatchingAction::FillLimit(client_order_id) => self.release(trigger_instrument_id, client_order_id, false),
            MatchingAction::Expire(client_order_id) => self.expire(trigger_instrument_id, client_order_id),
        }
    }

    fn expire(&mut self, trigger_instrument_id: InstrumentId, client_order_id: ClientOrderId) {
        let Some(order) = self.cache.order(client_order_id) else { return };
        let mut order = order.clone();
        self.submit_order_commands.remove(&client_order_id);
        if let Some(core) = self.matching_cores.get_mut(&trigger_instrument_id) {
            let _ = core.delete_order(client_order_id);
        }
        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Expired(OrderExpired {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.update_order(order);
        self.msgbus.publish_event(event);
    }

    /// Transforms a triggered order into a plain `MARKET` (`as_market = true`) or `LIMIT` order
    /// and forwards it downstream, clearing emulation.
    fn release(&mut self, trigger_instrument_id: InstrumentId, client_order_id: ClientOrderId, as_market: bool) {
        let Some(core) = self.matching_cores.get(&trigger_instrument_id) else {
            log::error!("Cannot release order: no matching core for instrument {trigger_instrument_id}");
            return;
        };
        let Some(order) = core.order(client_order_id).cloned() else { return };

        let released_price = match order.order_side_specified() {
            OrderSide::Buy => core.ask(),
            OrderSide::Sell => core.bid(),
            OrderSide::NoOrderSide => None,
        };
        let Some(released_price) = released_price else {
            log::warn!("Cannot release order {client_order_id} yet: no market data available, will retry on next update");
            return;
        };

        let Some(mut command) = self.submit_order_commands.remove(&client_order_id) else {
            log::debug!("Cannot release order {client_order_id}: already released by a previous call");
            return;
        };

        if let Some(core) = self.matching_cores.get_mut(&trigger_instrument_id) {
            let _ = core.delete_order(client_order_id);
        }

        let ts_now = self.clock.timestamp_ns();
        let mut transformed = if as_market || order.order_type == OrderType::Market {
            order.transform_to_market(ts_now)
        } else {
            order.transform_to_limit(ts_now)
        };

        let init_event = OrderEventAny::Initialized(OrderInitialized {
            trader_id: transformed.trader_id,
            strategy_id: transformed.strategy_id,
            instrument_id: transformed.instrument_id,
            client_order_id: transformed.client_order_id,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        transformed.apply(init_event.clone());

        let position_id = self.cache.position_id(client_order_id);
        let client_id = self.cache.client_id(transformed.strategy_id);
        self.cache.add_order(transformed.clone(), position_id, client_id);
        self.msgbus.publish_event(init_event);

        let released_event = OrderEventAny::Released(OrderReleased {
            trader_id: transformed.trader_id,
            strategy_id: transformed.strategy_id,
            instrument_id: transformed.instrument_id,
            client_order_id: transformed.client_order_id,
            released_price,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        transformed.apply(released_event.clone());
        self.cache.update_order(transformed.clone());
        self.msgbus.publish_event(released_event);

        log::info!("Releasing order {client_order_id}");

        command = order_to_submit_order(&transformed);
        if let Some(exec_algorithm_id) = transformed.exec_algorithm_id {
            self.msgbus.send_algo_submit_order(exec_algorithm_id, command);
        } else {
            self.msgbus.send_exec_submit_order(command);
        }
    }

    /// Reference prices for a trailing order's instrument: the matching core's own quote/trade
    /// state, backfilled from the cache's last known quote/trade if the core hasn't seen live
    /// data yet (e.g. a trailing order submitted before any tick has arrived).
    fn trailing_reference_prices(&self, trigger_instrument_id: InstrumentId) -> Option<(Option<Price>, Option<Price>, Option<Price>)> {
        let core = self.matching_cores.get(&trigger_instrument_id)?;
        let (mut bid, mut ask, mut last) = (core.bid(), core.ask(), core.last());
        if bid.is_none() || ask.is_none() {
            if let Some(quote) = self.cache.quote(trigger_instrument_id) {
                bid.get_or_insert(quote.bid_price);
                ask.get_or_insert(quote.ask_price);
            }
        }
        if last.is_none() {
            if let Some(trade) = self.cache.trade(trigger_instrument_id) {
                last.get_or_insert(trade.price);
            }
        }
        Some((bid, ask, last))
    }

    /// Computes a trailing order's initial trigger/limit price at submission time, setting the
    /// fields directly with no event — the order hasn't been emulated yet, so there is nothing
    /// to amend.
    fn seed_trailing_stop(&mut self, order: &mut Order) {
        let trigger_instrument_id = order.trigger_instrument_id();
        let Some(core) = self.matching_cores.get(&trigger_instrument_id) else {
            log::error!("Cannot seed trailing-stop order: no matching core for instrument {trigger_instrument_id}");
            return;
        };
        let price_increment = core.price_increment;
        let Some((bid, ask, last)) = self.trailing_reference_prices(trigger_instrument_id) else { return };

        match trailing_stop_calculate(price_increment, order, bid, ask, last) {
            Ok((trigger, price)) => {
                if let Some(trigger) = trigger {
                    order.trigger_price = Some(trigger);
                }
                if let Some(price) = price {
                    order.price = Some(price);
                }
            }
            Err(e) => log::warn!("Cannot seed trailing-stop order {}: {e}", order.client_order_id),
        }
    }

    /// Recomputes a resting trailing order's trigger/limit price against the current market,
    /// emitting `OrderUpdated` if it tightened.
    fn recompute_trailing_stop(&mut self, order: &mut Order) {
        let trigger_instrument_id = order.trigger_instrument_id();
        let Some(core) = self.matching_cores.get(&trigger_instrument_id) else {
            log::error!("Cannot update trailing-stop order: no matching core for instrument {trigger_instrument_id}");
            return;
        };
        let price_increment = core.price_increment;
        let Some((bid, ask, last)) = self.trailing_reference_prices(trigger_instrument_id) else { return };

        let (new_trigger, new_price): (Option<Price>, Option<Price>) =
            match trailing_stop_calculate(price_increment, order, bid, ask, last) {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("Cannot calculate trailing-stop update: {e}");
                    return;
                }
            };

        if new_trigger.is_none() && new_price.is_none() {
            return;
        }

        let ts_now = self.clock.timestamp_ns();
        let event = OrderEventAny::Updated(crate::events::OrderUpdated {
            trader_id: order.trader_id,
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            quantity: order.quantity,
            price: new_price,
            trigger_price: new_trigger,
            event_id: new_event_id(),
            ts_event: ts_now,
            ts_init: ts_now,
        });
        order.apply(event.clone());
        self.cache.update_order(order.clone());
        self.msgbus.send_risk_submit_order(order_to_submit_order(order));
        self.msgbus.publish_event(event);
        self.resort_after_amend(order);
    }
}
