//! Shared types for the ARBLEDGER engine.
//!
//! These types form the data model used across all modules. A `Wager` is
//! the plain record handed over by the external store; everything else in
//! the crate derives from it without mutating it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Position a leg occupies inside its arbitrage group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegSlot {
    A,
    B,
    C,
    D,
    E,
}

impl LegSlot {
    /// All slots in display order.
    pub const ALL: [LegSlot; 5] = [LegSlot::A, LegSlot::B, LegSlot::C, LegSlot::D, LegSlot::E];

    /// Array index of this slot (A = 0 … E = 4).
    pub fn index(&self) -> usize {
        match self {
            LegSlot::A => 0,
            LegSlot::B => 1,
            LegSlot::C => 2,
            LegSlot::D => 3,
            LegSlot::E => 4,
        }
    }
}

impl fmt::Display for LegSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegSlot::A => write!(f, "A"),
            LegSlot::B => write!(f, "B"),
            LegSlot::C => write!(f, "C"),
            LegSlot::D => write!(f, "D"),
            LegSlot::E => write!(f, "E"),
        }
    }
}

impl std::str::FromStr for LegSlot {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(LegSlot::A),
            "b" => Ok(LegSlot::B),
            "c" => Ok(LegSlot::C),
            "d" => Ok(LegSlot::D),
            "e" => Ok(LegSlot::E),
            _ => Err(LedgerError::UnknownTag { kind: "slot", value: s.to_string() }),
        }
    }
}

/// Back (for) or lay (against, exchange) wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerMode {
    Back,
    Lay,
}

impl fmt::Display for WagerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerMode::Back => write!(f, "back"),
            WagerMode::Lay => write!(f, "lay"),
        }
    }
}

impl std::str::FromStr for WagerMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "back" | "for" => Ok(WagerMode::Back),
            "lay" | "against" => Ok(WagerMode::Lay),
            _ => Err(LedgerError::UnknownTag { kind: "mode", value: s.to_string() }),
        }
    }
}

/// Settlement status of a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerStatus {
    Pending,
    Won,
    Lost,
    Returned,
    Cashout,
}

impl WagerStatus {
    pub const ALL: &'static [WagerStatus] = &[
        WagerStatus::Pending,
        WagerStatus::Won,
        WagerStatus::Lost,
        WagerStatus::Returned,
        WagerStatus::Cashout,
    ];

    /// Whether the outcome of this leg is known.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, WagerStatus::Pending)
    }
}

impl fmt::Display for WagerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerStatus::Pending => write!(f, "pending"),
            WagerStatus::Won => write!(f, "won"),
            WagerStatus::Lost => write!(f, "lost"),
            WagerStatus::Returned => write!(f, "returned"),
            WagerStatus::Cashout => write!(f, "cashout"),
        }
    }
}

impl std::str::FromStr for WagerStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "open" => Ok(WagerStatus::Pending),
            "won" | "win" => Ok(WagerStatus::Won),
            "lost" | "lose" | "loss" => Ok(WagerStatus::Lost),
            "returned" | "void" | "refunded" => Ok(WagerStatus::Returned),
            "cashout" | "cashed_out" | "cash_out" => Ok(WagerStatus::Cashout),
            _ => Err(LedgerError::UnknownTag { kind: "status", value: s.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager
// ---------------------------------------------------------------------------

/// One leg of an arbitrage group, exactly as the external store keeps it.
///
/// `stake_field` and `potential_return_field` are raw storage. Their meaning
/// depends on `mode` and `is_freebet`; read them through
/// [`crate::engine::valuation::WagerExposure`], never directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wager {
    pub id: String,
    pub counterparty_name: String,
    pub leg_slot: LegSlot,
    pub odds: Decimal,
    pub stake_field: Decimal,
    pub potential_return_field: Decimal,
    pub mode: WagerMode,
    #[serde(default)]
    pub is_freebet: bool,
    #[serde(default)]
    pub boost_percentage: Decimal,
    pub status: WagerStatus,
    #[serde(default)]
    pub cashout_amount: Option<Decimal>,
    pub event_date: String,
    pub event_time: String,
    #[serde(default)]
    pub group_key: Option<String>,
    #[serde(default)]
    pub market: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match (self.mode, self.is_freebet) {
            (WagerMode::Lay, _) => "LAY",
            (WagerMode::Back, true) => "FREEBET",
            (WagerMode::Back, false) => "BACK",
        };
        write!(
            f,
            "[{}] {} {} @ {} ({}) {} {}",
            self.leg_slot,
            self.counterparty_name,
            kind,
            self.odds,
            self.status,
            self.event_date,
            self.event_time,
        )
    }
}

impl Wager {
    /// Whether this leg is still awaiting its outcome.
    pub fn is_pending(&self) -> bool {
        self.status == WagerStatus::Pending
    }

    /// Group key with blank strings treated as absent.
    pub fn group_key(&self) -> Option<&str> {
        self.group_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Helper to build a test/sample wager with sensible defaults.
    #[cfg(test)]
    pub fn sample(id: &str, slot: LegSlot) -> Self {
        use rust_decimal_macros::dec;

        Wager {
            id: id.to_string(),
            counterparty_name: "Bookie".to_string(),
            leg_slot: slot,
            odds: dec!(2.0),
            stake_field: dec!(100),
            potential_return_field: dec!(200),
            mode: WagerMode::Back,
            is_freebet: false,
            boost_percentage: Decimal::ZERO,
            status: WagerStatus::Pending,
            cashout_amount: None,
            event_date: "2026-03-14".to_string(),
            event_time: "20:45".to_string(),
            group_key: Some("g-1".to_string()),
            market: "Match winner".to_string(),
            created_at: DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Typed failures at the edges of the engine.
///
/// The valuation, settlement and aggregation path itself never fails; these
/// only surface from parsing, strict clustering, editing and configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error("Unknown {kind}: {value}")]
    UnknownTag { kind: &'static str, value: String },

    #[error("Duplicate slot {slot} in group {group}: {first} and {second}")]
    DuplicateSlot {
        group: String,
        slot: LegSlot,
        first: String,
        second: String,
    },

    #[error("Wager not found in draft: {0}")]
    UnknownWager(String),

    #[error("Slot {0} is already occupied")]
    SlotOccupied(LegSlot),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
