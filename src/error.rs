// -------------------------------------------------------------------------------------------------
//  Error types for the order emulation core.
// -------------------------------------------------------------------------------------------------

use thiserror::Error;

use crate::identifiers::ClientOrderId;

/// Domain errors raised by [`crate::matching_core::MatchingCore`].
///
/// These are the only errors the core returns as `Result`s; everything else (unsupported
/// trigger, unknown instrument, missing command cache entry, ...) is a recoverable condition
/// handled inline by the emulator with a log call and a local cancel, because there is no
/// caller to propagate a `Result` to in an event-driven component.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `add_order` was called for a `client_order_id` already resident in the core.
    #[error("order already exists in matching core: {0}")]
    DuplicateOrder(ClientOrderId),
    /// `delete_order` was called for a `client_order_id` not resident in the core.
    #[error("order not found in matching core: {0}")]
    OrderNotFound(ClientOrderId),
}
