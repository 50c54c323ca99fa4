//! Historical statistics — overall, monthly and per-counterparty.
//!
//! Only resolved groups contribute money figures. A group with a pending
//! leg is counted as pending and nothing else, the same way it shows zero
//! profit in the group view.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::engine::aggregator::{fold, Group};
use crate::engine::settlement::settle;
use crate::format::{format_money, format_percent, format_profit, percent_of};

// ---------------------------------------------------------------------------
// Period statistics
// ---------------------------------------------------------------------------

/// Aggregated group results over some period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub groups: usize,
    pub resolved: usize,
    pub pending: usize,
    /// Resolved groups with positive profit.
    pub winning: usize,
    /// Resolved groups with negative profit.
    pub losing: usize,
    pub total_cost: Decimal,
    pub total_return: Decimal,
    pub profit: Decimal,
}

impl PeriodStats {
    fn record(&mut self, group: &Group) {
        self.groups += 1;
        let outcome = fold(group);
        if !outcome.resolved {
            self.pending += 1;
            return;
        }
        self.resolved += 1;
        self.total_cost = self.total_cost.saturating_add(outcome.total_cost);
        self.total_return = self.total_return.saturating_add(outcome.total_return);
        self.profit = self.profit.saturating_add(outcome.profit);
        if outcome.profit > Decimal::ZERO {
            self.winning += 1;
        } else if outcome.profit < Decimal::ZERO {
            self.losing += 1;
        }
    }

    /// Profit over cost of resolved groups, as a percentage.
    pub fn roi(&self) -> Decimal {
        percent_of(self.profit, self.total_cost)
    }

    /// Share of resolved groups that made money, as a percentage.
    pub fn win_rate(&self) -> Decimal {
        percent_of(Decimal::from(self.winning), Decimal::from(self.resolved))
    }

    pub fn render(&self, symbol: &str) -> String {
        format!(
            "groups={} (resolved {} / pending {}) | W{}/L{} ({}) | cost={} | profit={} | roi={}",
            self.groups,
            self.resolved,
            self.pending,
            self.winning,
            self.losing,
            format_percent(self.win_rate()),
            format_money(self.total_cost, symbol),
            format_profit(self.profit, symbol),
            format_percent(self.roi()),
        )
    }
}

/// Calendar month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl YearMonth {
    /// Month of a group's event. Unparsable dates land in the epoch month,
    /// matching their display order.
    pub fn of(group: &Group) -> Self {
        let ts = group.event_timestamp();
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

/// Statistics over every group.
pub fn overall(groups: &[Group]) -> PeriodStats {
    let mut stats = PeriodStats::default();
    for group in groups {
        stats.record(group);
    }
    debug!(groups = stats.groups, resolved = stats.resolved, profit = %stats.profit, "Overall stats");
    stats
}

/// Statistics bucketed by event month, oldest first.
pub fn monthly(groups: &[Group]) -> BTreeMap<YearMonth, PeriodStats> {
    let mut months: BTreeMap<YearMonth, PeriodStats> = BTreeMap::new();
    for group in groups {
        months.entry(YearMonth::of(group)).or_default().record(group);
    }
    months
}

// ---------------------------------------------------------------------------
// Counterparty statistics
// ---------------------------------------------------------------------------

/// Leg-level results for one house or exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterpartyStats {
    pub legs: usize,
    /// Legs belonging to resolved groups.
    pub settled_legs: usize,
    pub total_cost: Decimal,
    pub total_return: Decimal,
    pub profit: Decimal,
}

impl CounterpartyStats {
    pub fn roi(&self) -> Decimal {
        percent_of(self.profit, self.total_cost)
    }
}

/// Per-counterparty leg results. Legs of unresolved groups are counted but
/// carry no money figures.
pub fn by_counterparty(groups: &[Group]) -> BTreeMap<String, CounterpartyStats> {
    let mut houses: BTreeMap<String, CounterpartyStats> = BTreeMap::new();
    for group in groups {
        let resolved = group.is_resolved();
        for wager in group.legs() {
            let name = wager.counterparty_name.trim();
            let entry = houses.entry(name.to_string()).or_default();
            entry.legs += 1;
            if !resolved {
                continue;
            }
            let s = settle(wager);
            entry.settled_legs += 1;
            entry.total_cost = entry.total_cost.saturating_add(s.valuation.real_cost);
            entry.total_return = entry.total_return.saturating_add(s.realized_return);
            entry.profit = entry.profit.saturating_add(s.profit);
        }
    }
    houses
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
