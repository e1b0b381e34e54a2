// -------------------------------------------------------------------------------------------------
//  Trading commands routed through the emulation engine.
// -------------------------------------------------------------------------------------------------

use crate::{
    enums::{ContingencyType, OrderSide, OrderType, TimeInForce, TrailingOffsetType, TriggerType},
    identifiers::{ClientOrderId, ExecAlgorithmId, ExecSpawnId, InstrumentId, StrategyId, TraderId},
    order::Order,
    types::{Price, Quantity},
};

/// Submits a brand-new order for processing.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOrder {
    pub trader_id: TraderId,
    pub client_order_id: ClientOrderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub trigger_instrument_id: Option<InstrumentId>,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub activation_price: Option<Price>,
    pub trailing_offset: Option<rust_decimal::Decimal>,
    pub limit_offset: Option<rust_decimal::Decimal>,
    pub trailing_offset_type: TrailingOffsetType,
    pub emulation_trigger: TriggerType,
    pub time_in_force: TimeInForce,
    pub expire_time_ns: Option<u64>,
    pub contingency_type: ContingencyType,
    pub linked_order_ids: Vec<ClientOrderId>,
    pub parent_order_id: Option<ClientOrderId>,
    pub exec_algorithm_id: Option<ExecAlgorithmId>,
    pub exec_spawn_id: Option<ExecSpawnId>,
    pub ts_init: u64,
}

impl SubmitOrder {
    /// Materializes the [`Order`] this command describes, in its initial (un-submitted) state.
    #[must_use]
    pub fn to_order(&self) -> Order {
        Order {
            client_order_id: self.client_order_id,
            trader_id: self.trader_id,
            strategy_id: self.strategy_id,
            instrument_id: self.instrument_id,
            trigger_instrument_id: self.trigger_instrument_id,
            side: self.side,
            order_type: self.order_type,
            quantity: self.quantity,
            filled_qty: Quantity::zero(self.quantity.precision),
            price: self.price,
            trigger_price: self.trigger_price,
            activation_price: self.activation_price,
            trailing_offset: self.trailing_offset,
            limit_offset: self.limit_offset,
            trailing_offset_type: self.trailing_offset_type,
            status: crate::enums::OrderStatus::Initialized,
            emulation_trigger: self.emulation_trigger,
            time_in_force: self.time_in_force,
            expire_time_ns: self.expire_time_ns,
            contingency_type: self.contingency_type,
            linked_order_ids: self.linked_order_ids.clone(),
            parent_order_id: self.parent_order_id,
            exec_algorithm_id: self.exec_algorithm_id,
            exec_spawn_id: self.exec_spawn_id,
            ts_init: self.ts_init,
            events: Vec::new(),
        }
    }
}

/// Builds the command that would (re-)submit `order` as it currently stands; used both to arm a
/// dormant contingency leg and to forward a just-released order downstream.
#[must_use]
pub fn order_to_submit_order(order: &Order) -> SubmitOrder {
    SubmitOrder {
        trader_id: order.trader_id,
        client_order_id: order.client_order_id,
        strategy_id: order.strategy_id,
        instrument_id: order.instrument_id,
        trigger_instrument_id: order.trigger_instrument_id,
        side: order.side,
        order_type: order.order_type,
        quantity: order.quantity,
        price: order.price,
        trigger_price: order.trigger_price,
        activation_price: order.activation_price,
        trailing_offset: order.trailing_offset,
        limit_offset: order.limit_offset,
        trailing_offset_type: order.trailing_offset_type,
        emulation_trigger: order.emulation_trigger,
        time_in_force: order.time_in_force,
        expire_time_ns: order.expire_time_ns,
        contingency_type: order.contingency_type,
        linked_order_ids: order.linked_order_ids.clone(),
        parent_order_id: order.parent_order_id,
        exec_algorithm_id: order.exec_algorithm_id,
        exec_spawn_id: order.exec_spawn_id,
        ts_init: order.ts_init,
    }
}

/// Modifies a resting order's quantity, price, or trigger price.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub ts_init: u64,
}

/// Cancels a single resting order.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub ts_init: u64,
}

/// Cancels every order resting for an instrument (optionally narrowed to one side).
#[derive(Debug, Clone, PartialEq)]
pub struct CancelAllOrders {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub order_side: OrderSide,
    pub ts_init: u64,
}

/// Any command the engine can execute, dispatched via an exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum TradingCommand {
    SubmitOrder(SubmitOrder),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
    CancelAllOrders(CancelAllOrders),
}

impl TradingCommand {
    #[must_use]
    pub const fn strategy_id(&self) -> StrategyId {
        match self {
            Self::SubmitOrder(c) => c.strategy_id,
            Self::ModifyOrder(c) => c.strategy_id,
            Self::CancelOrder(c) => c.strategy_id,
            Self::CancelAllOrders(c) => c.strategy_id,
        }
    }

    #[must_use]
    pub const fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::SubmitOrder(c) => c.instrument_id,
            Self::ModifyOrder(c) => c.instrument_id,
            Self::CancelOrder(c) => c.instrument_id,
            Self::CancelAllOrders(c) => c.instrument_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ContingencyType, OrderSide, OrderStatus, OrderType, TriggerType};

    #[test]
    fn submit_order_materializes_initialized_order() {
        let command = SubmitOrder {
            trader_id: TraderId::from("TRADER-001"),
            client_order_id: ClientOrderId::from("O-1"),
            strategy_id: StrategyId::from("S-001"),
            instrument_id: InstrumentId::from("AAPL.XNAS"),
            trigger_instrument_id: None,
            side: OrderSide::Buy,
            order_type: OrderType::StopMarket,
            quantity: Quantity::from("10"),
            price: None,
            trigger_price: Some(Price::from("101.00")),
            activation_price: None,
            trailing_offset: None,
            limit_offset: None,
            trailing_offset_type: TrailingOffsetType::NoTrailingOffset,
            emulation_trigger: TriggerType::BidAsk,
            time_in_force: TimeInForce::Gtc,
            expire_time_ns: None,
            contingency_type: ContingencyType::NoContingency,
            linked_order_ids: Vec::new(),
            parent_order_id: None,
            exec_algorithm_id: None,
            exec_spawn_id: None,
            ts_init: 1,
        };
        let order = command.to_order();
        assert_eq!(order.status, OrderStatus::Initialized);
        assert!(order.filled_qty.is_zero());
        assert_eq!(order.client_order_id, command.client_order_id);
    }
}
