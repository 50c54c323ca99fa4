//! Settlement resolver — what a leg actually paid out.
//!
//! Picks the realized return from the leg's status and derives profit
//! and ROI from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::valuation::{valuate, Valuation};
use crate::format::{percent_of, sanitize_amount};
use crate::types::{Wager, WagerStatus};

/// Settled figures for one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSettlement {
    pub valuation: Valuation,
    pub status: WagerStatus,
    pub realized_return: Decimal,
    /// Zero while the leg is pending.
    pub profit: Decimal,
    /// Percentage; zero while pending or when nothing was at risk.
    pub roi: Decimal,
    pub resolved: bool,
}

/// Money actually received for a leg with the given status.
pub fn realized_return(
    status: WagerStatus,
    cashout_amount: Option<Decimal>,
    valuation: &Valuation,
) -> Decimal {
    match status {
        WagerStatus::Won => valuation.potential_return,
        WagerStatus::Returned => valuation.real_cost,
        WagerStatus::Cashout => cashout_amount.map(sanitize_amount).unwrap_or(Decimal::ZERO),
        WagerStatus::Lost | WagerStatus::Pending => Decimal::ZERO,
    }
}

/// `realized − cost`.
pub fn profit(realized: Decimal, real_cost: Decimal) -> Decimal {
    realized - real_cost
}

/// `profit / cost × 100`, zero when the cost is zero (e.g. a won freebet).
pub fn roi(profit: Decimal, real_cost: Decimal) -> Decimal {
    percent_of(profit, real_cost)
}

/// Settle a stored wager.
pub fn settle(wager: &Wager) -> LegSettlement {
    let valuation = valuate(wager);
    let resolved = wager.status.is_resolved();
    let realized = realized_return(wager.status, wager.cashout_amount, &valuation);

    let (leg_profit, leg_roi) = if resolved {
        let p = profit(realized, valuation.real_cost);
        (p, roi(p, valuation.real_cost))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    LegSettlement {
        valuation,
        status: wager.status,
        realized_return: realized,
        profit: leg_profit,
        roi: leg_roi,
        resolved,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
