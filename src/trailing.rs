// -------------------------------------------------------------------------------------------------
//  Trailing-stop geometry: recomputes a trailing order's trigger (and, for trailing-stop-limit
//  orders, limit) price from the current market, without ever moving the trigger the wrong way.
// -------------------------------------------------------------------------------------------------

use anyhow::{anyhow, bail, Result};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    enums::{OrderSide, TrailingOffsetType, TriggerType},
    order::Order,
    types::Price,
};

/// Recomputes the trigger (and limit, if applicable) price for a trailing order against the
/// current market.
///
/// Returns `(None, None)` when the order isn't active yet (its `activation_price` hasn't been
/// reached) or when the freshly computed trigger is not an improvement over the order's current
/// one — trailing stops only ever tighten, never loosen.
///
/// # Errors
///
/// Returns an error if the order is missing a `trailing_offset`, if the reference price its
/// `emulation_trigger` calls for isn't available, or if its `emulation_trigger` or
/// `trailing_offset_type` can't be used for a trailing calculation.
pub fn trailing_stop_calculate(
    price_increment: Price,
    order: &Order,
    bid: Option<Price>,
    ask: Option<Price>,
    last: Option<Price>,
) -> Result<(Option<Price>, Option<Price>)> {
    let side = order.order_side_specified();
    let trailing_offset = order
        .trailing_offset
        .ok_or_else(|| anyhow!("order {} has no trailing_offset set", order.client_order_id))?;

    let reference_price = match order.emulation_trigger {
        TriggerType::Default | TriggerType::LastPrice | TriggerType::MarkPrice => {
            last.ok_or_else(|| anyhow!("no last price available to trail order {}", order.client_order_id))?
        }
        TriggerType::BidAsk | TriggerType::LastOrBidAsk => match side {
            OrderSide::Buy => ask.ok_or_else(|| anyhow!("no ask price available to trail order {}", order.client_order_id))?,
            OrderSide::Sell => bid.ok_or_else(|| anyhow!("no bid price available to trail order {}", order.client_order_id))?,
            OrderSide::NoOrderSide => bail!("order {} has no side", order.client_order_id),
        },
        TriggerType::IndexPrice | TriggerType::NoTrigger => {
            bail!("unsupported trigger type for trailing calculation: {:?}", order.emulation_trigger)
        }
    };

    if let Some(activation_price) = order.activation_price {
        let activated = match side {
            OrderSide::Buy => reference_price <= activation_price,
            OrderSide::Sell => reference_price >= activation_price,
            OrderSide::NoOrderSide => false,
        };
        if !activated {
            return Ok((None, None));
        }
    }

    let offset_value = offset_in_price(price_increment, order.trailing_offset_type, reference_price, trailing_offset)?;

    let new_trigger_price = match side {
        OrderSide::Buy => Price::from_raw(reference_price.raw + offset_value.raw, reference_price.precision),
        OrderSide::Sell => Price::from_raw(reference_price.raw - offset_value.raw, reference_price.precision),
        OrderSide::NoOrderSide => bail!("order {} has no side", order.client_order_id),
    };

    let improves = match order.trigger_price {
        None => true,
        Some(current) => match side {
            OrderSide::Buy => new_trigger_price < current,
            OrderSide::Sell => new_trigger_price > current,
            OrderSide::NoOrderSide => false,
        },
    };
    if !improves {
        return Ok((None, None));
    }

    let new_price = if order.order_type.is_trailing_stop() && order.order_type.has_limit_price() {
        let limit_offset = order.limit_offset.unwrap_or(trailing_offset);
        let limit_offset_value = offset_in_price(price_increment, order.trailing_offset_type, new_trigger_price, limit_offset)?;
        Some(match side {
            OrderSide::Buy => Price::from_raw(new_trigger_price.raw + limit_offset_value.raw, new_trigger_price.precision),
            OrderSide::Sell => Price::from_raw(new_trigger_price.raw - limit_offset_value.raw, new_trigger_price.precision),
            OrderSide::NoOrderSide => bail!("order {} has no side", order.client_order_id),
        })
    } else {
        None
    };

    Ok((Some(new_trigger_price), new_price))
}

fn offset_in_price(price_increment: Price, offset_type: TrailingOffsetType, reference_price: Price, offset: Decimal) -> Result<Price> {
    let offset_f64 = offset.to_f64().ok_or_else(|| anyhow!("trailing offset {offset} out of range"))?;
    match offset_type {
        TrailingOffsetType::Price => Ok(Price::new(offset_f64, reference_price.precision)),
        TrailingOffsetType::BasisPoints => {
            Ok(Price::new(reference_price.as_f64() * (offset_f64 / 10_000.0), reference_price.precision))
        }
        TrailingOffsetType::Ticks => {
            let raw = (offset_f64 * price_increment.raw as f64).round() as i64;
            Ok(Price::from_raw(raw, reference_price.precision))
        }
        TrailingOffsetType::NoTrailingOffset => bail!("order has no trailing_offset_type set"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::enums::{ContingencyType, OrderStatus, OrderType, TimeInForce};
    use crate::identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId};
    use crate::types::Quantity;

    fn trailing_order(side: OrderSide, order_type: OrderType, trailing_offset_type: TrailingOffsetType, trailing_offset: Decimal) -> Order {
        Order {
            client_order_id: ClientOrderId::from("O-1"),
            trader_id: TraderId::from("TRADER-001"),
            strategy_id: StrategyId::from("S-001"),
            instrument_id: InstrumentId::from("AAPL.XNAS"),
            trigger_instrument_id: None,
            side,
            order_type,
            quantity: Quantity::from("10"),
            filled_qty: Quantity::zero(0),
            price: Some(Price::from("100.00")),
            trigger_price: None,
            activation_price: None,
            trailing_offset: Some(trailing_offset),
            limit_offset: Some(trailing_offset),
            trailing_offset_type,
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

    #[rstest]
    #[case(TrailingOffsetType::Price, dec!(1.00), "100.00", 101.00)]
    #[case(TrailingOffsetType::BasisPoints, dec!(100), "100.00", 101.00)]
    fn buy_trailing_offset_above_ask(#[case] offset_type: TrailingOffsetType, #[case] offset: Decimal, #[case] ask: &str, #[case] expected: f64) {
        let order = trailing_order(OrderSide::Buy, OrderType::TrailingStopMarket, offset_type, offset);
        let (trigger, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from(ask)), None).unwrap();
        assert_eq!(trigger.unwrap().as_f64(), expected);
    }

    #[test]
    fn ticks_offset_uses_price_increment() {
        let order = trailing_order(OrderSide::Sell, OrderType::TrailingStopMarket, TrailingOffsetType::Ticks, dec!(5));
        let (trigger, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, Some(Price::from("100.00")), None, None).unwrap();
        assert_eq!(trigger.unwrap().as_f64(), 99.95);
    }

    #[test]
    fn buy_trailing_only_tightens_downward() {
        let mut order = trailing_order(OrderSide::Buy, OrderType::TrailingStopMarket, TrailingOffsetType::Price, dec!(1.00));
        order.trigger_price = Some(Price::from("100.00"));

        let (unchanged, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("100.00")), None).unwrap();
        assert!(unchanged.is_none(), "ask rising should not loosen a buy trailing stop");

        let (tightened, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("98.00")), None).unwrap();
        assert_eq!(tightened.unwrap().as_f64(), 99.00);
    }

    #[test]
    fn sell_trailing_only_tightens_upward() {
        let mut order = trailing_order(OrderSide::Sell, OrderType::TrailingStopMarket, TrailingOffsetType::Price, dec!(1.00));
        order.trigger_price = Some(Price::from("100.00"));

        let (unchanged, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, Some(Price::from("100.00")), None, None).unwrap();
        assert!(unchanged.is_none(), "bid falling should not loosen a sell trailing stop");

        let (tightened, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, Some(Price::from("102.00")), None, None).unwrap();
        assert_eq!(tightened.unwrap().as_f64(), 101.00);
    }

    #[test]
    fn inactive_until_activation_price_reached() {
        let mut order = trailing_order(OrderSide::Buy, OrderType::TrailingStopMarket, TrailingOffsetType::Price, dec!(1.00));
        order.activation_price = Some(Price::from("95.00"));

        let (not_yet, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("100.00")), None).unwrap();
        assert!(not_yet.is_none());

        let (activated, _) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("94.00")), None).unwrap();
        assert_eq!(activated.unwrap().as_f64(), 95.00);
    }

    #[test]
    fn trailing_stop_limit_also_moves_limit_price() {
        let order = trailing_order(OrderSide::Buy, OrderType::TrailingStopLimit, TrailingOffsetType::Price, dec!(1.00));
        let (trigger, price) = trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("100.00")), None).unwrap();
        assert_eq!(trigger.unwrap().as_f64(), 101.00);
        assert_eq!(price.unwrap().as_f64(), 102.00);
    }

    #[test]
    fn missing_trailing_offset_errors() {
        let mut order = trailing_order(OrderSide::Buy, OrderType::TrailingStopMarket, TrailingOffsetType::Price, dec!(1.00));
        order.trailing_offset = None;
        assert!(trailing_stop_calculate(Price::new(0.01, 2), &order, None, Some(Price::from("100.00")), None).is_err());
    }
}
