// -------------------------------------------------------------------------------------------------
//  Outbound routing: everything the engine sends downstream (to the risk engine, the exec
//  engine, exec-algorithm endpoints) or publishes for strategies to observe.
// -------------------------------------------------------------------------------------------------

use std::fmt::Debug;

use crate::{
    events::OrderEventAny,
    identifiers::{ExecAlgorithmId, InstrumentId},
    messages::{CancelOrder, ModifyOrder, SubmitOrder},
};

/// The engine's only egress point; a trait so tests can record what was sent without standing
/// up a real risk/exec engine.
pub trait MessageBus: Debug {
    /// Publishes an event for any interested subscriber (typically the owning strategy).
    fn publish_event(&mut self, event: OrderEventAny);

    fn send_risk_submit_order(&mut self, command: SubmitOrder);

    fn send_exec_submit_order(&mut self, command: SubmitOrder);

    /// Routes a submit to a named exec-algorithm endpoint rather than straight to the exec engine.
    fn send_algo_submit_order(&mut self, exec_algorithm_id: ExecAlgorithmId, command: SubmitOrder);

    fn send_exec_modify_order(&mut self, command: ModifyOrder);

    fn send_exec_cancel_order(&mut self, command: CancelOrder);

    fn subscribe_quotes(&mut self, instrument_id: InstrumentId);

    fn subscribe_trades(&mut self, instrument_id: InstrumentId);
}

/// Records every call instead of performing any real I/O; used by tests to assert on exactly
/// what the engine tried to do downstream.
#[derive(Debug, Default)]
pub struct RecordingMessageBus {
    pub published_events: Vec<OrderEventAny>,
    pub risk_submits: Vec<SubmitOrder>,
    pub exec_submits: Vec<SubmitOrder>,
    pub algo_submits: Vec<(ExecAlgorithmId, SubmitOrder)>,
    pub exec_modifies: Vec<ModifyOrder>,
    pub exec_cancels: Vec<CancelOrder>,
    pub quote_subscriptions: Vec<InstrumentId>,
    pub trade_subscriptions: Vec<InstrumentId>,
}

impl RecordingMessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageBus for RecordingMessageBus {
    fn publish_event(&mut self, event: OrderEventAny) {
        self.published_events.push(event);
    }

    fn send_risk_submit_order(&mut self, command: SubmitOrder) {
        self.risk_submits.push(command);
    }

    fn send_exec_submit_order(&mut self, command: SubmitOrder) {
        self.exec_submits.push(command);
    }

    fn send_algo_submit_order(&mut self, exec_algorithm_id: ExecAlgorithmId, command: SubmitOrder) {
        self.algo_submits.push((exec_algorithm_id, command));
    }

    fn send_exec_modify_order(&mut self, command: ModifyOrder) {
        self.exec_modifies.push(command);
    }

    fn send_exec_cancel_order(&mut self, command: CancelOrder) {
        self.exec_cancels.push(command);
    }

    fn subscribe_quotes(&mut self, instrument_id: InstrumentId) {
        self.quote_subscriptions.push(instrument_id);
    }

    fn subscribe_trades(&mut self, instrument_id: InstrumentId) {
        self.trade_subscriptions.push(instrument_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId};

    #[test]
    fn recording_bus_captures_quote_subscription() {
        let mut bus = RecordingMessageBus::new();
        bus.subscribe_quotes(InstrumentId::from("AAPL.XNAS"));
        assert_eq!(bus.quote_subscriptions, vec![InstrumentId::from("AAPL.XNAS")]);
    }

    #[test]
    fn recording_bus_captures_cancel() {
        let mut bus = RecordingMessageBus::new();
        bus.send_exec_cancel_order(CancelOrder {
            trader_id: TraderId::from("TRADER-001"),
            strategy_id: StrategyId::from("S-001"),
            instrument_id: InstrumentId::from("AAPL.XNAS"),
            client_order_id: ClientOrderId::from("O-1"),
            ts_init: 0,
        });
        assert_eq!(bus.exec_cancels.len(), 1);
    }
}
