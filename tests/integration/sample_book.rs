//! Sample wager book for integration testing.
//!
//! Builds store-shaped records the way the external store would hand them
//! over: lay legs carry their liability in `stake_field`, freebets carry
//! their bonus there.

use arbledger::engine::valuation::WagerExposure;
use arbledger::types::{LegSlot, Wager, WagerMode, WagerStatus};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

/// Fluent builder for store records.
pub struct WagerBuilder {
    wager: Wager,
    placed: Decimal,
}

impl WagerBuilder {
    pub fn new(id: &str, group: &str, slot: LegSlot) -> Self {
        Self {
            wager: Wager {
                id: id.to_string(),
                counterparty_name: format!("House {slot}"),
                leg_slot: slot,
                odds: Decimal::TWO,
                stake_field: Decimal::ZERO,
                potential_return_field: Decimal::ZERO,
                mode: WagerMode::Back,
                is_freebet: false,
                boost_percentage: Decimal::ZERO,
                status: WagerStatus::Pending,
                cashout_amount: None,
                event_date: "2026-06-12".to_string(),
                event_time: "21:00".to_string(),
                group_key: Some(group.to_string()),
                market: "1X2".to_string(),
                created_at: Utc
                    .with_ymd_and_hms(2026, 6, 1, 10, 0, 0)
                    .single()
                    .unwrap_or_default(),
            },
            placed: Decimal::ZERO,
        }
    }

    pub fn stake(mut self, amount: Decimal) -> Self {
        self.placed = amount;
        self
    }

    pub fn odds(mut self, odds: Decimal) -> Self {
        self.wager.odds = odds;
        self
    }

    pub fn lay(mut self) -> Self {
        self.wager.mode = WagerMode::Lay;
        self
    }

    pub fn freebet(mut self) -> Self {
        self.wager.is_freebet = true;
        self
    }

    pub fn boost(mut self, pct: Decimal) -> Self {
        self.wager.boost_percentage = pct;
        self
    }

    pub fn status(mut self, status: WagerStatus) -> Self {
        self.wager.status = status;
        self
    }

    pub fn cashout(mut self, amount: Decimal) -> Self {
        self.wager.status = WagerStatus::Cashout;
        self.wager.cashout_amount = Some(amount);
        self
    }

    pub fn event(mut self, date: &str, time: &str) -> Self {
        self.wager.event_date = date.to_string();
        self.wager.event_time = time.to_string();
        self
    }

    pub fn counterparty(mut self, name: &str) -> Self {
        self.wager.counterparty_name = name.to_string();
        self
    }

    /// Finish the record with stored fields in sync with its terms.
    pub fn build(mut self) -> Wager {
        let w = &self.wager;
        let exposure = WagerExposure::from_placed(self.placed, w.odds, w.mode, w.is_freebet);
        let stored = exposure.stored_fields(w.odds, w.boost_percentage);
        self.wager.stake_field = stored.stake_field;
        self.wager.potential_return_field = stored.potential_return_field;
        self.wager
    }
}
