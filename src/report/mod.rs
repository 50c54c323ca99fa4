//! Reporting — per-leg and per-group figures ready for display, plus
//! historical statistics.

pub mod stats;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregator::{fold, main_leg, ClusterKey, Group, GroupOutcome};
use crate::engine::settlement::settle;
use crate::format::{format_money, format_percent, format_profit};
use crate::types::{LegSlot, Wager, WagerMode, WagerStatus};

// ---------------------------------------------------------------------------
// Leg report
// ---------------------------------------------------------------------------

/// Display-ready figures for one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegReport {
    pub id: String,
    pub slot: LegSlot,
    pub counterparty_name: String,
    /// `BACK`, `FREEBET` or `LAY`.
    pub kind: &'static str,
    pub odds: Decimal,
    pub effective_odds: Decimal,
    pub display_stake: Decimal,
    pub real_cost: Decimal,
    pub potential_return: Decimal,
    pub realized_return: Decimal,
    pub profit: Decimal,
    pub roi: Decimal,
    pub status: WagerStatus,
    pub resolved: bool,
}

impl LegReport {
    pub fn from_wager(wager: &Wager) -> Self {
        let s = settle(wager);
        let kind = match (wager.mode, wager.is_freebet) {
            (WagerMode::Lay, _) => "LAY",
            (WagerMode::Back, true) => "FREEBET",
            (WagerMode::Back, false) => "BACK",
        };
        Self {
            id: wager.id.clone(),
            slot: wager.leg_slot,
            counterparty_name: wager.counterparty_name.clone(),
            kind,
            odds: wager.odds,
            effective_odds: s.valuation.effective_odds,
            display_stake: s.valuation.display_stake,
            real_cost: s.valuation.real_cost,
            potential_return: s.valuation.potential_return,
            realized_return: s.realized_return,
            profit: s.profit,
            roi: s.roi,
            status: s.status,
            resolved: s.resolved,
        }
    }

    pub fn render(&self, symbol: &str) -> String {
        format!(
            "  {} {:<16} {:<7} {} @ {:.2} cost={} ret={} [{}]",
            self.slot,
            self.counterparty_name,
            self.kind,
            format_money(self.display_stake, symbol),
            self.effective_odds,
            format_money(self.real_cost, symbol),
            format_money(self.potential_return, symbol),
            self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Group summary
// ---------------------------------------------------------------------------

/// Display-ready figures for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub key: ClusterKey,
    /// Market label of the main leg.
    pub market: String,
    pub event_timestamp: NaiveDateTime,
    pub legs: Vec<LegReport>,
    pub outcome: GroupOutcome,
}

impl GroupSummary {
    pub fn from_group(group: &Group) -> Self {
        Self {
            key: group.key().clone(),
            market: main_leg(group).map(|w| w.market.clone()).unwrap_or_default(),
            event_timestamp: group.event_timestamp(),
            legs: group.legs().map(LegReport::from_wager).collect(),
            outcome: fold(group),
        }
    }

    /// Multi-line rendering: header with the group result, then one line
    /// per leg.
    pub fn render(&self, symbol: &str) -> String {
        let result = if self.outcome.resolved {
            format!(
                "{} ({})",
                format_profit(self.outcome.profit, symbol),
                format_percent(self.outcome.roi)
            )
        } else {
            "PENDING".to_string()
        };

        let mut out = format!(
            "{} {} | {} | cost={} | {}",
            self.key.event_date,
            self.key.event_time,
            if self.market.is_empty() { "-" } else { self.market.as_str() },
            format_money(self.outcome.total_cost, symbol),
            result,
        );
        for leg in &self.legs {
            out.push('\n');
            out.push_str(&leg.render(symbol));
        }
        out
    }
}

/// Summaries for already-ordered groups.
pub fn summarize(groups: &[Group]) -> Vec<GroupSummary> {
    groups.iter().map(GroupSummary::from_group).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
