//! Group aggregator — clusters legs into arbitrage groups and folds their
//! settlements into group-level figures.
//!
//! A group is never stored. It is rebuilt from the flat wager collection
//! every time that collection changes, so the same input always yields the
//! same groups in the same order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::settlement::{settle, LegSettlement};
use crate::format::percent_of;
use crate::types::{LedgerError, LegSlot, Wager};

// ---------------------------------------------------------------------------
// Keys & policy
// ---------------------------------------------------------------------------

/// What happens when two wagers of one group claim the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPolicy {
    /// The later wager (input order) silently replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Clustering fails with [`LedgerError::DuplicateSlot`].
    Reject,
}

/// Group part of a [`ClusterKey`]. Singletons live in their own key space
/// so a wager id can never collide with a user-assigned group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GroupId {
    /// Group key assigned by the user.
    Keyed(String),
    /// Wager without a group key, identified by its own id.
    Solo(String),
}

impl GroupId {
    /// The user-assigned key, if any.
    pub fn keyed(&self) -> Option<&str> {
        match self {
            GroupId::Keyed(k) => Some(k),
            GroupId::Solo(_) => None,
        }
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupId::Keyed(k) => write!(f, "{k}"),
            GroupId::Solo(id) => write!(f, "solo:{id}"),
        }
    }
}

/// Identity of a group: `(event_date, event_time, group)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterKey {
    pub event_date: String,
    pub event_time: String,
    pub group: GroupId,
}

impl ClusterKey {
    /// Key for a wager. Wagers without a group key get a singleton key
    /// derived from their own id.
    pub fn of(wager: &Wager) -> Self {
        let group = match wager.group_key() {
            Some(k) => GroupId::Keyed(k.to_string()),
            None => GroupId::Solo(wager.id.clone()),
        };
        Self {
            event_date: wager.event_date.trim().to_string(),
            event_time: wager.event_time.trim().to_string(),
            group,
        }
    }

    /// Combined event timestamp, if date and time parse.
    pub fn event_timestamp(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.event_date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(&self.event_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.event_time, "%H:%M"))
            .ok()?;
        Some(date.and_time(time))
    }
}

impl std::fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} #{}", self.event_date, self.event_time, self.group)
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// Up to five legs sharing one [`ClusterKey`], indexed by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: ClusterKey,
    slots: [Option<Wager>; 5],
}

impl Group {
    pub fn new(key: ClusterKey) -> Self {
        Self {
            key,
            slots: Default::default(),
        }
    }

    pub fn key(&self) -> &ClusterKey {
        &self.key
    }

    pub fn leg(&self, slot: LegSlot) -> Option<&Wager> {
        self.slots[slot.index()].as_ref()
    }

    /// Present legs in slot order A→E.
    pub fn legs(&self) -> impl Iterator<Item = &Wager> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.legs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any leg is still pending.
    pub fn has_pending(&self) -> bool {
        self.legs().any(Wager::is_pending)
    }

    /// A group is resolved only when no leg is pending.
    pub fn is_resolved(&self) -> bool {
        !self.has_pending()
    }

    /// Place a wager in its slot, returning whatever occupied it before.
    pub fn insert(&mut self, wager: Wager) -> Option<Wager> {
        let idx = wager.leg_slot.index();
        self.slots[idx].replace(wager)
    }

    /// Settlement of every present leg, in slot order.
    pub fn settlements(&self) -> Vec<(LegSlot, LegSettlement)> {
        self.legs().map(|w| (w.leg_slot, settle(w))).collect()
    }

    /// Event timestamp, falling back to the Unix epoch when unparsable.
    pub fn event_timestamp(&self) -> NaiveDateTime {
        self.key
            .event_timestamp()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH.naive_utc())
    }

    /// Most recent `created_at` among the legs.
    pub fn latest_created_at(&self) -> Option<DateTime<Utc>> {
        self.legs().map(|w| w.created_at).max()
    }
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// Partition wagers into groups, duplicate slots resolved last-write-wins,
/// ordered for display.
pub fn cluster(wagers: &[Wager]) -> Vec<Group> {
    cluster_with(wagers, SlotPolicy::LastWriteWins).unwrap_or_default()
}

/// Partition wagers into groups under an explicit duplicate-slot policy.
pub fn cluster_with(wagers: &[Wager], policy: SlotPolicy) -> Result<Vec<Group>, LedgerError> {
    let mut index: HashMap<ClusterKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for wager in wagers {
        let key = ClusterKey::of(wager);
        let idx = match index.get(&key) {
            Some(&i) => i,
            None => {
                groups.push(Group::new(key.clone()));
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        if let Some(existing) = group.leg(wager.leg_slot) {
            match policy {
                SlotPolicy::Reject => {
                    return Err(LedgerError::DuplicateSlot {
                        group: group.key().to_string(),
                        slot: wager.leg_slot,
                        first: existing.id.clone(),
                        second: wager.id.clone(),
                    });
                }
                SlotPolicy::LastWriteWins => {
                    warn!(
                        group = %group.key(),
                        slot = %wager.leg_slot,
                        replaced = %existing.id,
                        by = %wager.id,
                        "Duplicate slot, later wager wins"
                    );
                }
            }
        }
        group.insert(wager.clone());
    }

    sort_for_display(&mut groups);

    debug!(wagers = wagers.len(), groups = groups.len(), "Clustered wagers");
    Ok(groups)
}

/// Newest event first. Unparsable timestamps sort as the epoch; ties go to
/// the most recently created group, then to the key.
pub fn sort_for_display(groups: &mut [Group]) {
    for group in groups.iter() {
        if group.key().event_timestamp().is_none() {
            warn!(group = %group.key(), "Unparsable event timestamp, sorting as epoch");
        }
    }
    groups.sort_by_cached_key(|g| {
        (
            Reverse(g.event_timestamp()),
            Reverse(g.latest_created_at()),
            g.key().clone(),
        )
    });
}

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Group-level figures folded from its legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOutcome {
    /// Σ real cost over present legs.
    pub total_cost: Decimal,
    /// Σ realized return over present legs.
    pub total_return: Decimal,
    /// Zero while unresolved.
    pub profit: Decimal,
    /// Percentage; zero while unresolved or when nothing was at risk.
    pub roi: Decimal,
    pub resolved: bool,
}

/// Fold every leg of a group. A single pending leg makes the whole group
/// unresolved: profit and ROI are reported as zero.
pub fn fold(group: &Group) -> GroupOutcome {
    let (total_cost, total_return) = group
        .legs()
        .map(settle)
        .fold((Decimal::ZERO, Decimal::ZERO), |(cost, ret), s| {
            (
                cost.saturating_add(s.valuation.real_cost),
                ret.saturating_add(s.realized_return),
            )
        });

    let resolved = group.is_resolved();
    let (profit, roi) = if resolved {
        let p = total_return.saturating_sub(total_cost);
        (p, percent_of(p, total_cost))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    debug!(
        group = %group.key(),
        legs = group.len(),
        %total_cost,
        %total_return,
        %profit,
        resolved,
        "Group folded"
    );

    GroupOutcome {
        total_cost,
        total_return,
        profit,
        roi,
        resolved,
    }
}

/// Σ realized − Σ cost, or zero while any leg is pending.
pub fn group_profit(group: &Group) -> Decimal {
    fold(group).profit
}

/// Group profit over total cost × 100, or zero while any leg is pending or
/// when the total cost is zero.
pub fn group_roi(group: &Group) -> Decimal {
    fold(group).roi
}

/// First present leg in slot order; the group's display anchor.
pub fn main_leg(group: &Group) -> Option<&Wager> {
    group.legs().next()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
