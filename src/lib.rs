//! A deterministic order-trigger emulation and contingent-order coordination engine.
//!
//! Holds orders whose trigger condition a venue can't natively evaluate — STOP, STOP_LIMIT,
//! MARKET_IF_TOUCHED, LIMIT_IF_TOUCHED, and the two TRAILING_STOP variants — locally, watches
//! market data for that condition, and releases each order downstream as a plain MARKET or
//! LIMIT order once it fires. Alongside triggering, it coordinates linked contingency groups:
//! OTO (one triggers the other), OCO (one cancels the others), and OUO (one updates the others).
//!
//! - **Matching core**: per-instrument trigger/marketability evaluation against bid/ask/last.
//! - **Trailing**: trigger/limit price recalculation for trailing-stop orders.
//! - **Contingency**: OTO/OCO/OUO coordination driven by inbound order events.
//! - **Emulator**: the top-level engine tying matching, trailing, and contingency together
//!   against a pluggable cache, message bus, and clock.
//!
//! # Feature flags
//!
//! This crate has no optional feature flags; every module is always compiled in.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod clock;
pub mod contingency;
pub mod emulator;
pub mod enums;
pub mod error;
pub mod events;
pub mod identifiers;
pub mod matching_core;
pub mod messages;
pub mod msgbus;
pub mod order;
pub mod trailing;
pub mod types;
