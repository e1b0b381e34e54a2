// -------------------------------------------------------------------------------------------------
//  Contingency coordination: OTO (one triggers other), OCO (one cancels others), and OUO (one
//  updates others) groups of linked orders.
//
//  Driven entirely by inbound order events for orders already known to the cache; this module
//  never originates a matching-core lookup itself; the owning engine supplies an `apply` closure
//  for the local-cancel/local-update side effects (matching core removal, event emission) it
//  doesn't have access to here.
// -------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use crate::{
    cache::OrderCache,
    enums::ContingencyType,
    events::{OrderEventAny, OrderFilled, OrderUpdated},
    identifiers::ClientOrderId,
    messages::{order_to_submit_order, SubmitOrder},
    order::Order,
};

const EVT: &str = "EVT";

/// What the engine should do in response to a contingency decision; returned rather than
/// executed directly so the caller can apply it with access to the matching core and message
/// bus (see module docs).
#[derive(Debug, Clone, PartialEq)]
pub enum ContingencyAction {
    /// Arm a dormant OTO child by submitting it for the first time.
    Submit(SubmitOrder),
    /// Cancel a sibling locally (remove from its matching core, drop its command, emit
    /// `OrderCanceled`).
    CancelLocally(ClientOrderId),
    /// Propagate a quantity/leaves amendment to a sibling.
    UpdateQuantity(ClientOrderId, crate::types::Quantity),
}

/// Inspects one inbound event and returns the contingency actions it implies.
///
/// `commands` is the engine's command cache (`client_order_id` -> still-pending `SubmitOrder`),
/// consulted (but not mutated) to decide whether an OTO child has already been armed.
#[must_use]
pub fn handle_event(
    cache: &dyn OrderCache,
    commands: &HashMap<ClientOrderId, SubmitOrder>,
    event: &OrderEventAny,
) -> Vec<ContingencyAction> {
    let client_order_id = event.client_order_id();
    let Some(order) = cache.order(client_order_id) else {
        log::warn!("{EVT} contingency event for an order unknown to the cache: {client_order_id}");
        return Vec::new();
    };

    match event {
        OrderEventAny::Filled(filled) => handle_filled(cache, commands, order, filled),
        OrderEventAny::Canceled(_) | OrderEventAny::Expired(_) | OrderEventAny::Rejected(_) => {
            handle_closed(cache, order)
        }
        OrderEventAny::Updated(updated) => handle_updated(cache, order, updated),
        OrderEventAny::Emulated(_) | OrderEventAny::Initialized(_) | OrderEventAny::Released(_) => Vec::new(),
    }
}

fn handle_filled(
    cache: &dyn OrderCache,
    commands: &HashMap<ClientOrderId, SubmitOrder>,
    order: &Order,
    _filled: &OrderFilled,
) -> Vec<ContingencyAction> {
    let mut actions = Vec::new();

    match order.contingency_type {
        ContingencyType::Oto => actions.extend(arm_oto_children(cache, commands, order)),
        ContingencyType::Oco => actions.extend(cancel_open_siblings(cache, order)),
        ContingencyType::Ouo => {
            if order.is_closed() {
                actions.extend(cancel_open_siblings(cache, order));
            } else {
                actions.extend(propagate_leaves_qty(cache, order));
            }
        }
        ContingencyType::NoContingency => {}
    }

    if let Some(exec_spawn_id) = order.exec_spawn_id {
        actions.extend(reconcile_spawn_group_quantity(cache, order, exec_spawn_id));
    }

    actions
}

fn handle_closed(cache: &dyn OrderCache, order: &Order) -> Vec<ContingencyAction> {
    match order.contingency_type {
        ContingencyType::Oco | ContingencyType::Ouo => cancel_open_siblings(cache, order),
        ContingencyType::Oto | ContingencyType::NoContingency => Vec::new(),
    }
}

fn handle_updated(cache: &dyn OrderCache, order: &Order, updated: &OrderUpdated) -> Vec<ContingencyAction> {
    if order.contingency_type != ContingencyType::Ouo {
        return Vec::new();
    }
    // Orders spawned by an execution algorithm don't drive OUO propagation themselves; only
    // their primary does.
    if order.exec_spawn_id.is_some() && order.parent_order_id.is_some() {
        return Vec::new();
    }
    order
        .linked_order_ids
        .iter()
        .filter_map(|&sibling_id| {
            let sibling = cache.order(sibling_id)?;
            if sibling.is_closed() {
                return None;
            }
            Some(ContingencyAction::UpdateQuantity(sibling_id, updated.quantity))
        })
        .collect()
}

fn arm_oto_children(cache: &dyn OrderCache, commands: &HashMap<ClientOrderId, SubmitOrder>, primary: &Order) -> Vec<ContingencyAction> {
    if primary.is_pending_cancel() || primary.is_closed() {
        return Vec::new();
    }
    primary
        .linked_order_ids
        .iter()
        .filter_map(|&child_id| {
            if commands.contains_key(&child_id) {
                return None;
            }
            let child = cache.order(child_id)?;
            Some(ContingencyAction::Submit(order_to_submit_order(child)))
        })
        .collect()
}

fn cancel_open_siblings(cache: &dyn OrderCache, order: &Order) -> Vec<ContingencyAction> {
    order
        .linked_order_ids
        .iter()
        .filter_map(|&sibling_id| {
            let sibling = cache.order(sibling_id)?;
            if sibling.is_closed() {
                return None;
            }
            Some(ContingencyAction::CancelLocally(sibling_id))
        })
        .collect()
}

/// A non-closing fill on an OUO leg resizes every open sibling to the filled leg's `leaves_qty`,
/// rather than canceling them outright (that only happens once the leg itself closes).
fn propagate_leaves_qty(cache: &dyn OrderCache, order: &Order) -> Vec<ContingencyAction> {
    let leaves_qty = order.leaves_qty();
    order
        .linked_order_ids
        .iter()
        .filter_map(|&sibling_id| {
            let sibling = cache.order(sibling_id)?;
            if sibling.is_closed() {
                return None;
            }
            Some(ContingencyAction::UpdateQuantity(sibling_id, leaves_qty))
        })
        .collect()
}

/// If a spawn group's aggregate filled quantity has outgrown what an OTO child was sized for,
/// reduce the child by the amount already filled. Preserves the letter of the behavior this is
/// grounded on: the reduction is `child.quantity - total_filled_qty`, not a resize to the
/// primary's remaining leaves.
fn reconcile_spawn_group_quantity(
    cache: &dyn OrderCache,
    order: &Order,
    exec_spawn_id: crate::identifiers::ExecSpawnId,
) -> Vec<ContingencyAction> {
    if order.contingency_type != ContingencyType::Oto {
        return Vec::new();
    }
    let total_filled = cache.exec_spawn_total_filled_qty(exec_spawn_id);
    order
        .linked_order_ids
        .iter()
        .filter_map(|&child_id| {
            let child = cache.order(child_id)?;
            if total_filled.raw == child.quantity.raw {
                return None;
            }
            let new_raw = (child.quantity.raw - total_filled.raw).max(0);
            Some(ContingencyAction::UpdateQuantity(
                child_id,
                crate::types::Quantity { raw: new_raw, precision: child.quantity.precision },
            ))
        })
        .collect()
}
