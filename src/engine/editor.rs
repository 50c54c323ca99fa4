//! Group editor — shadow copy, field edits, recompute on commit.
//!
//! The engine has no notion of saving. A [`GroupDraft`] holds the values a
//! user sees (display stake, not liability), accepts field-level edits, and
//! on [`GroupDraft::commit`] re-derives the stored fields of every leg so
//! the caller can hand them to the external persistence call. A leg whose
//! stake, odds, mode and freebet flag are untouched keeps the exposure it
//! was read with, so degenerate historical records survive a commit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::aggregator::{fold, ClusterKey, Group, GroupOutcome};
use super::valuation::{valuate, StoredFields, WagerExposure};
use crate::format::{parse_amount, sanitize_amount, sanitize_odds, sanitize_percentage};
use crate::types::{LedgerError, LegSlot, Wager, WagerMode, WagerStatus};

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A single field-level change to one leg.
#[derive(Debug, Clone, PartialEq)]
pub enum WagerEdit {
    /// Amount placed, as the user sees it.
    Stake(Decimal),
    Odds(Decimal),
    Mode(WagerMode),
    Freebet(bool),
    Boost(Decimal),
    Status(WagerStatus),
    CashoutAmount(Option<Decimal>),
    Counterparty(String),
    Market(String),
}

/// Raw form values for one leg, as posted by an edit form. Absent fields
/// are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegForm {
    pub stake: Option<String>,
    pub odds: Option<String>,
    pub mode: Option<String>,
    pub freebet: Option<bool>,
    pub boost: Option<String>,
    pub status: Option<String>,
    pub cashout_amount: Option<String>,
    pub counterparty: Option<String>,
    pub market: Option<String>,
}

impl LegForm {
    /// Translate raw values into edits. Numeric garbage becomes zero;
    /// unknown mode or status tags are an error.
    pub fn edits(&self) -> Result<Vec<WagerEdit>, LedgerError> {
        let mut edits = Vec::new();
        if let Some(raw) = &self.stake {
            edits.push(WagerEdit::Stake(parse_amount(raw)));
        }
        if let Some(raw) = &self.odds {
            edits.push(WagerEdit::Odds(parse_amount(raw)));
        }
        if let Some(raw) = &self.mode {
            edits.push(WagerEdit::Mode(raw.parse()?));
        }
        if let Some(flag) = self.freebet {
            edits.push(WagerEdit::Freebet(flag));
        }
        if let Some(raw) = &self.boost {
            edits.push(WagerEdit::Boost(parse_amount(raw)));
        }
        if let Some(raw) = &self.status {
            edits.push(WagerEdit::Status(raw.parse()?));
        }
        if let Some(raw) = &self.cashout_amount {
            let amount = if raw.trim().is_empty() { None } else { Some(parse_amount(raw)) };
            edits.push(WagerEdit::CashoutAmount(amount));
        }
        if let Some(name) = &self.counterparty {
            edits.push(WagerEdit::Counterparty(name.trim().to_string()));
        }
        if let Some(name) = &self.market {
            edits.push(WagerEdit::Market(name.trim().to_string()));
        }
        Ok(edits)
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Editable shadow copy of one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegDraft {
    pub id: String,
    /// Leg opened in this draft, not yet known to the store.
    pub is_new: bool,
    pub slot: LegSlot,
    pub counterparty_name: String,
    pub market: String,
    pub odds: Decimal,
    /// Display stake (amount placed), never the stored liability.
    pub stake: Decimal,
    pub mode: WagerMode,
    pub is_freebet: bool,
    pub boost_percentage: Decimal,
    pub status: WagerStatus,
    pub cashout_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    origin: Option<Origin>,
}

/// Stored exposure of an existing leg and the terms it was read with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Origin {
    exposure: WagerExposure,
    stake: Decimal,
    odds: Decimal,
    mode: WagerMode,
    is_freebet: bool,
}

impl Origin {
    fn unchanged(&self, leg: &LegDraft) -> bool {
        self.stake == leg.stake
            && self.odds == leg.odds
            && self.mode == leg.mode
            && self.is_freebet == leg.is_freebet
    }
}

impl LegDraft {
    fn from_wager(wager: &Wager) -> Self {
        let valuation = valuate(wager);
        let odds = sanitize_odds(wager.odds);
        Self {
            id: wager.id.clone(),
            is_new: false,
            slot: wager.leg_slot,
            counterparty_name: wager.counterparty_name.clone(),
            market: wager.market.clone(),
            odds,
            stake: valuation.display_stake,
            mode: wager.mode,
            is_freebet: wager.is_freebet,
            boost_percentage: sanitize_percentage(wager.boost_percentage),
            status: wager.status,
            cashout_amount: wager.cashout_amount,
            created_at: wager.created_at,
            origin: Some(Origin {
                exposure: valuation.exposure,
                stake: valuation.display_stake,
                odds,
                mode: wager.mode,
                is_freebet: wager.is_freebet,
            }),
        }
    }

    fn apply(&mut self, edit: WagerEdit) {
        match edit {
            WagerEdit::Stake(v) => self.stake = sanitize_amount(v),
            WagerEdit::Odds(v) => self.odds = sanitize_odds(v),
            WagerEdit::Mode(m) => self.mode = m,
            WagerEdit::Freebet(f) => self.is_freebet = f,
            WagerEdit::Boost(v) => self.boost_percentage = sanitize_percentage(v),
            WagerEdit::Status(s) => self.status = s,
            WagerEdit::CashoutAmount(v) => self.cashout_amount = v.map(sanitize_amount),
            WagerEdit::Counterparty(name) => self.counterparty_name = name,
            WagerEdit::Market(name) => self.market = name,
        }
    }

    /// Exposure implied by the drafted values. Re-derived from the display
    /// stake only once a term it depends on has changed.
    pub fn exposure(&self) -> WagerExposure {
        match self.origin {
            Some(origin) if origin.unchanged(self) => origin.exposure,
            _ => WagerExposure::from_placed(self.stake, self.odds, self.mode, self.is_freebet),
        }
    }

    /// Boost that actually applies: plain back wagers only.
    fn applicable_boost(&self) -> Decimal {
        match (self.mode, self.is_freebet) {
            (WagerMode::Back, false) => self.boost_percentage,
            _ => Decimal::ZERO,
        }
    }

    /// Rebuild the stored record from the drafted values.
    fn to_wager(&self, key: &ClusterKey) -> Wager {
        let boost = self.applicable_boost();
        let stored = self.exposure().stored_fields(self.odds, boost);
        Wager {
            id: self.id.clone(),
            counterparty_name: self.counterparty_name.clone(),
            leg_slot: self.slot,
            odds: self.odds,
            stake_field: stored.stake_field,
            potential_return_field: stored.potential_return_field,
            mode: self.mode,
            is_freebet: self.mode == WagerMode::Back && self.is_freebet,
            boost_percentage: boost,
            status: self.status,
            cashout_amount: match self.status {
                WagerStatus::Cashout => self.cashout_amount,
                _ => None,
            },
            event_date: key.event_date.clone(),
            event_time: key.event_time.clone(),
            group_key: key.group.keyed().map(str::to_string),
            market: self.market.clone(),
            created_at: self.created_at,
        }
    }
}

/// Values the external persistence call writes back for one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerUpdate {
    pub id: String,
    pub is_new: bool,
    #[serde(flatten)]
    pub stored: StoredFields,
    pub status: WagerStatus,
    pub cashout_amount: Option<Decimal>,
}

/// Everything a commit produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPlan {
    /// Recomputed records for every remaining leg, in slot order.
    pub wagers: Vec<Wager>,
    pub updates: Vec<WagerUpdate>,
    /// Ids of legs removed from the draft.
    pub deletes: Vec<String>,
}

/// Editable shadow copy of a whole group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDraft {
    key: ClusterKey,
    legs: Vec<LegDraft>,
    removed: Vec<String>,
}

impl GroupDraft {
    /// Copy the current settled values of a group.
    pub fn from_group(group: &Group) -> Self {
        Self {
            key: group.key().clone(),
            legs: group.legs().map(LegDraft::from_wager).collect(),
            removed: Vec::new(),
        }
    }

    pub fn key(&self) -> &ClusterKey {
        &self.key
    }

    pub fn legs(&self) -> &[LegDraft] {
        &self.legs
    }

    pub fn leg(&self, id: &str) -> Option<&LegDraft> {
        self.legs.iter().find(|l| l.id == id)
    }

    /// Apply one field edit to the leg with the given id.
    pub fn apply(&mut self, id: &str, edit: WagerEdit) -> Result<(), LedgerError> {
        let leg = self
            .legs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LedgerError::UnknownWager(id.to_string()))?;
        debug!(id, ?edit, "Draft edit");
        leg.apply(edit);
        Ok(())
    }

    /// Apply raw form values keyed by wager id. Nothing is applied if any
    /// id is unknown or any tag fails to parse.
    pub fn apply_form(&mut self, forms: &HashMap<String, LegForm>) -> Result<(), LedgerError> {
        let mut pending = Vec::with_capacity(forms.len());
        for (id, form) in forms {
            if self.leg(id).is_none() {
                return Err(LedgerError::UnknownWager(id.clone()));
            }
            pending.push((id.as_str(), form.edits()?));
        }
        for (id, edits) in pending {
            for edit in edits {
                self.apply(id, edit)?;
            }
        }
        Ok(())
    }

    /// Open an empty slot with a fresh leg.
    pub fn add_leg(&mut self, slot: LegSlot, counterparty: &str) -> Result<&mut LegDraft, LedgerError> {
        if self.legs.iter().any(|l| l.slot == slot) {
            return Err(LedgerError::SlotOccupied(slot));
        }
        let leg = LegDraft {
            id: Uuid::new_v4().to_string(),
            is_new: true,
            slot,
            counterparty_name: counterparty.trim().to_string(),
            market: self.legs.first().map(|l| l.market.clone()).unwrap_or_default(),
            odds: Decimal::ZERO,
            stake: Decimal::ZERO,
            mode: WagerMode::Back,
            is_freebet: false,
            boost_percentage: Decimal::ZERO,
            status: WagerStatus::Pending,
            cashout_amount: None,
            created_at: Utc::now(),
            origin: None,
        };
        self.legs.push(leg);
        self.legs.sort_by_key(|l| l.slot);
        let idx = self
            .legs
            .iter()
            .position(|l| l.slot == slot)
            .ok_or(LedgerError::SlotOccupied(slot))?;
        Ok(&mut self.legs[idx])
    }

    /// Drop a leg from the draft.
    pub fn remove_leg(&mut self, id: &str) -> Result<LegDraft, LedgerError> {
        let idx = self
            .legs
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| LedgerError::UnknownWager(id.to_string()))?;
        let leg = self.legs.remove(idx);
        if !leg.is_new {
            self.removed.push(leg.id.clone());
        }
        Ok(leg)
    }

    fn wagers(&self) -> Vec<Wager> {
        self.legs.iter().map(|l| l.to_wager(&self.key)).collect()
    }

    /// Group figures the drafted values would produce, without committing.
    pub fn preview(&self) -> GroupOutcome {
        let mut group = Group::new(self.key.clone());
        for wager in self.wagers() {
            group.insert(wager);
        }
        fold(&group)
    }

    /// Re-derive stored fields for every leg.
    pub fn commit(self) -> CommitPlan {
        let wagers = self.wagers();
        let updates = wagers
            .iter()
            .zip(&self.legs)
            .map(|(w, draft)| WagerUpdate {
                id: w.id.clone(),
                is_new: draft.is_new,
                stored: StoredFields {
                    stake_field: w.stake_field,
                    potential_return_field: w.potential_return_field,
                },
                status: w.status,
                cashout_amount: w.cashout_amount,
            })
            .collect();

        info!(
            group = %self.key,
            legs = wagers.len(),
            deleted = self.removed.len(),
            "Draft committed"
        );

        CommitPlan {
            wagers,
            updates,
            deletes: self.removed,
        }
    }
}

/// Resynchronize the stored fields of one record with its terms.
pub fn recompute(wager: &Wager) -> Wager {
    LegDraft::from_wager(wager).to_wager(&ClusterKey::of(wager))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
