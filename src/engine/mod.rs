//! Core engine — valuation → settlement → group aggregation.
//!
//! Every layer is pure and synchronous; each only depends on the one
//! below it. The editor sits on top and feeds edited terms back through
//! the same valuation path before anything is persisted.

pub mod valuation;
pub mod settlement;
pub mod aggregator;
pub mod editor;

pub use aggregator::{cluster, cluster_with, fold, group_profit, group_roi, main_leg, Group, SlotPolicy};
pub use settlement::{settle, LegSettlement};
pub use valuation::{display_stake, valuate, Valuation, WagerExposure};
