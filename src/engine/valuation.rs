//! Valuation rules — what a single wager costs and what it can return.
//!
//! The store keeps one `stake_field` whose meaning changes with the wager
//! kind. [`WagerExposure`] is the only place that interprets it:
//!
//! | kind    | `stake_field` holds | real cost           | potential return          |
//! |---------|---------------------|---------------------|---------------------------|
//! | plain   | stake               | stake               | stake × effective odds    |
//! | freebet | bonus               | 0                   | (odds − 1) × bonus        |
//! | lay     | liability           | stake × (odds − 1)  | stake + liability         |
//!
//! Older freebet records carry 0 in `stake_field`; their bonus is recovered
//! from `potential_return_field / (odds − 1)`. Odds ≤ 1 are degenerate:
//! nothing is divided by `odds − 1` and every potential return is zero.
//! Amounts derived by division are capped like typed ones, so sums over
//! legs and groups stay inside `Decimal` range.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::{safe_div, sanitize_amount, sanitize_odds, sanitize_percentage};
use crate::types::{Wager, WagerMode};

// ---------------------------------------------------------------------------
// Exposure
// ---------------------------------------------------------------------------

/// The money a wager actually puts to work, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WagerExposure {
    /// Standard back bet: real money staked.
    Plain { stake: Decimal },
    /// Promotional back bet: bonus amount, nothing at risk.
    Freebet { bonus: Decimal },
    /// Exchange lay: liability at risk if the backed outcome happens.
    Lay { liability: Decimal },
}

/// Everything derivable from one wager's terms before its outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    pub exposure: WagerExposure,
    /// Odds after boost (equal to the raw odds for freebet and lay).
    pub effective_odds: Decimal,
    /// Money the bettor actually risks.
    pub real_cost: Decimal,
    /// Money received if the leg wins.
    pub potential_return: Decimal,
    /// The amount the user placed, as shown in tables and edit forms.
    pub display_stake: Decimal,
}

/// Stored representation written back to the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFields {
    pub stake_field: Decimal,
    pub potential_return_field: Decimal,
}

/// Odds with a percentage boost applied to the net part:
/// `odds + (odds − 1) × boost / 100`.
pub fn effective_odds(odds: Decimal, boost_percentage: Decimal) -> Decimal {
    let odds = sanitize_odds(odds);
    if odds <= Decimal::ONE {
        return odds;
    }
    let boost = sanitize_percentage(boost_percentage);
    odds + (odds - Decimal::ONE) * boost / dec!(100)
}

impl WagerExposure {
    /// Read the exposure out of a stored record. This is the canonical
    /// accessor over `stake_field` / `potential_return_field`.
    pub fn from_stored(wager: &Wager) -> Self {
        let odds = sanitize_odds(wager.odds);
        match (wager.mode, wager.is_freebet) {
            (WagerMode::Lay, _) => WagerExposure::Lay {
                liability: sanitize_amount(wager.stake_field),
            },
            (WagerMode::Back, true) => {
                let bonus = sanitize_amount(wager.stake_field);
                let bonus = if bonus.is_zero() {
                    sanitize_amount(safe_div(
                        sanitize_amount(wager.potential_return_field),
                        odds - Decimal::ONE,
                    ))
                } else {
                    bonus
                };
                WagerExposure::Freebet { bonus }
            }
            (WagerMode::Back, false) => WagerExposure::Plain {
                stake: sanitize_amount(wager.stake_field),
            },
        }
    }

    /// Build the exposure from the amount a user typed into a form.
    /// For lay wagers the typed amount is the backer's stake, and the
    /// liability is `amount × (odds − 1)`.
    pub fn from_placed(amount: Decimal, odds: Decimal, mode: WagerMode, is_freebet: bool) -> Self {
        let amount = sanitize_amount(amount);
        let odds = sanitize_odds(odds);
        match (mode, is_freebet) {
            (WagerMode::Lay, _) => {
                let liability = if odds > Decimal::ONE {
                    sanitize_amount(amount * (odds - Decimal::ONE))
                } else {
                    Decimal::ZERO
                };
                WagerExposure::Lay { liability }
            }
            (WagerMode::Back, true) => WagerExposure::Freebet { bonus: amount },
            (WagerMode::Back, false) => WagerExposure::Plain { stake: amount },
        }
    }

    /// Wager mode this exposure belongs to.
    pub fn mode(&self) -> WagerMode {
        match self {
            WagerExposure::Lay { .. } => WagerMode::Lay,
            _ => WagerMode::Back,
        }
    }

    pub fn is_freebet(&self) -> bool {
        matches!(self, WagerExposure::Freebet { .. })
    }

    /// Value this exposure at the given odds. Boost only counts for
    /// plain back wagers.
    pub fn value(&self, odds: Decimal, boost_percentage: Decimal) -> Valuation {
        let odds = sanitize_odds(odds);
        let degenerate = odds <= Decimal::ONE;
        let net = odds - Decimal::ONE;

        let (effective, real_cost, potential_return, display_stake) = match *self {
            WagerExposure::Plain { stake } => {
                let eff = effective_odds(odds, boost_percentage);
                let ret = if degenerate { Decimal::ZERO } else { stake * eff };
                (eff, stake, ret, stake)
            }
            WagerExposure::Freebet { bonus } => {
                let ret = if degenerate { Decimal::ZERO } else { net * bonus };
                (odds, Decimal::ZERO, ret, bonus)
            }
            WagerExposure::Lay { liability } => {
                let stake = sanitize_amount(safe_div(liability, net));
                let ret = if degenerate { Decimal::ZERO } else { stake + liability };
                (odds, liability, ret, stake)
            }
        };

        Valuation {
            exposure: *self,
            effective_odds: effective,
            real_cost,
            potential_return,
            display_stake,
        }
    }

    /// Amount this exposure keeps in `stake_field`.
    pub fn stake_field(&self) -> Decimal {
        match *self {
            WagerExposure::Plain { stake } => stake,
            WagerExposure::Freebet { bonus } => bonus,
            WagerExposure::Lay { liability } => liability,
        }
    }

    /// Fields to persist for this exposure at the given odds.
    pub fn stored_fields(&self, odds: Decimal, boost_percentage: Decimal) -> StoredFields {
        StoredFields {
            stake_field: self.stake_field(),
            potential_return_field: self.value(odds, boost_percentage).potential_return,
        }
    }
}

/// Full valuation of a stored wager.
pub fn valuate(wager: &Wager) -> Valuation {
    WagerExposure::from_stored(wager).value(wager.odds, wager.boost_percentage)
}

/// How much the user placed on this wager. Every display and edit path
/// reads the stake through here.
pub fn display_stake(wager: &Wager) -> Decimal {
    valuate(wager).display_stake
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
