//! End-to-end settlement scenarios.
//!
//! Drives whole wager books through clustering, settlement, editing and
//! statistics exactly as the dashboard would.

mod sample_book;

use arbledger::engine::editor::{GroupDraft, WagerEdit};
use arbledger::engine::valuation::{display_stake, valuate};
use arbledger::engine::aggregator::GroupId;
use arbledger::engine::{cluster, cluster_with, fold, group_profit, group_roi, main_leg, settle, SlotPolicy};
use arbledger::report::{stats, summarize};
use arbledger::storage::parse_wagers;
use arbledger::types::{LedgerError, LegSlot, WagerStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sample_book::WagerBuilder;

#[test]
fn test_two_way_back_arb_breaks_even() {
    let wagers = vec![
        WagerBuilder::new("a", "g", LegSlot::A).stake(dec!(100)).odds(dec!(2.0)).status(WagerStatus::Won).build(),
        WagerBuilder::new("b", "g", LegSlot::B).stake(dec!(100)).odds(dec!(2.1)).status(WagerStatus::Lost).build(),
    ];

    let groups = cluster(&wagers);
    assert_eq!(groups.len(), 1);
    let group = &groups[0];

    assert_eq!(settle(group.leg(LegSlot::A).unwrap()).realized_return, dec!(200));
    assert_eq!(settle(group.leg(LegSlot::B).unwrap()).realized_return, Decimal::ZERO);
    assert_eq!(group_profit(group), Decimal::ZERO);
    assert_eq!(group_roi(group), Decimal::ZERO);
}

#[test]
fn test_back_lay_matched_bet() {
    // Back 100 @ 3.0 at a bookmaker, lay 100 @ 3.0 on an exchange.
    let back = WagerBuilder::new("back", "m", LegSlot::A).stake(dec!(100)).odds(dec!(3.0));
    let lay = WagerBuilder::new("lay", "m", LegSlot::B).stake(dec!(100)).odds(dec!(3.0)).lay().counterparty("Exchange");

    // Backed outcome happens: back wins 300, lay loses its 200 liability.
    let groups = cluster(&[
        back.status(WagerStatus::Won).build(),
        lay.status(WagerStatus::Lost).build(),
    ]);
    let outcome = fold(&groups[0]);
    assert_eq!(outcome.total_cost, dec!(300));
    assert_eq!(outcome.total_return, dec!(300));
    assert_eq!(outcome.profit, Decimal::ZERO);

    let lay_leg = groups[0].leg(LegSlot::B).unwrap();
    assert_eq!(lay_leg.counterparty_name, "Exchange");
    assert_eq!(lay_leg.stake_field, dec!(200));
    assert_eq!(display_stake(lay_leg), dec!(100));
}

#[test]
fn test_freebet_conversion_profit() {
    // Freebet 50 @ 5.0 backed, hedged with a lay 40 @ 5.2.
    let groups = cluster(&[
        WagerBuilder::new("fb", "f", LegSlot::A).stake(dec!(50)).odds(dec!(5.0)).freebet().boost(dec!(30)).status(WagerStatus::Lost).build(),
        WagerBuilder::new("lay", "f", LegSlot::B).stake(dec!(40)).odds(dec!(5.2)).lay().status(WagerStatus::Won).build(),
    ]);
    let group = &groups[0];

    let fb = valuate(group.leg(LegSlot::A).unwrap());
    assert_eq!(fb.real_cost, Decimal::ZERO);
    assert_eq!(fb.potential_return, dec!(200));
    assert_eq!(fb.display_stake, dec!(50));

    // Lay liability 168 returns 40 + 168.
    let outcome = fold(group);
    assert_eq!(outcome.total_cost, dec!(168));
    assert_eq!(outcome.total_return, dec!(208));
    assert_eq!(outcome.profit, dec!(40));
}

#[test]
fn test_cashout_leg() {
    let w = WagerBuilder::new("c", "c", LegSlot::A).stake(dec!(50)).odds(dec!(3.0)).cashout(dec!(80)).build();
    let s = settle(&w);
    assert_eq!(s.valuation.potential_return, dec!(150));
    assert_eq!(s.realized_return, dec!(80));
    assert_eq!(s.profit, dec!(30));
    assert_eq!(s.roi, dec!(60));
}

#[test]
fn test_pending_leg_suppresses_group() {
    let groups = cluster(&[
        WagerBuilder::new("a", "p", LegSlot::A).stake(dec!(100)).odds(dec!(4.0)).status(WagerStatus::Won).build(),
        WagerBuilder::new("b", "p", LegSlot::B).stake(dec!(10)).odds(dec!(1.5)).build(),
    ]);
    assert_eq!(group_profit(&groups[0]), Decimal::ZERO);
    assert_eq!(group_roi(&groups[0]), Decimal::ZERO);
    assert!(!fold(&groups[0]).resolved);
}

#[test]
fn test_three_groups_sorted_and_anchored() {
    let wagers = vec![
        WagerBuilder::new("x1", "x", LegSlot::C).event("2026-06-10", "18:00").build(),
        WagerBuilder::new("y1", "y", LegSlot::A).event("2026-06-12", "21:00").build(),
        WagerBuilder::new("x2", "x", LegSlot::B).event("2026-06-10", "18:00").build(),
        // Same date and time as y but a different group key.
        WagerBuilder::new("z1", "z", LegSlot::A).event("2026-06-12", "21:00").build(),
    ];

    let groups = cluster(&wagers);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[2].key().group, GroupId::Keyed("x".to_string()));
    assert_eq!(main_leg(&groups[2]).unwrap().id, "x2");
}

#[test]
fn test_strict_policy_surfaces_duplicate() {
    let wagers = vec![
        WagerBuilder::new("one", "d", LegSlot::A).build(),
        WagerBuilder::new("two", "d", LegSlot::A).build(),
    ];
    assert_eq!(cluster(&wagers)[0].leg(LegSlot::A).unwrap().id, "two");
    assert!(matches!(
        cluster_with(&wagers, SlotPolicy::Reject),
        Err(LedgerError::DuplicateSlot { .. })
    ));
}

#[test]
fn test_edit_then_recluster() {
    let wagers = vec![
        WagerBuilder::new("a", "e", LegSlot::A).stake(dec!(100)).odds(dec!(2.5)).build(),
        WagerBuilder::new("b", "e", LegSlot::B).stake(dec!(150)).odds(dec!(2.5)).lay().build(),
    ];
    let groups = cluster(&wagers);

    let mut draft = GroupDraft::from_group(&groups[0]);
    draft.apply("b", WagerEdit::Odds(dec!(2.0))).unwrap();
    draft.apply("a", WagerEdit::Status(WagerStatus::Lost)).unwrap();
    draft.apply("b", WagerEdit::Status(WagerStatus::Won)).unwrap();
    let preview = draft.preview();
    let plan = draft.commit();

    // Lay stake 150 @ 2.0 → liability 150, returns 300.
    let lay = plan.wagers.iter().find(|w| w.id == "b").unwrap();
    assert_eq!(lay.stake_field, dec!(150));
    assert_eq!(lay.potential_return_field, dec!(300));

    let regrouped = cluster(&plan.wagers);
    assert_eq!(fold(&regrouped[0]), preview);
    assert_eq!(preview.profit, dec!(50));
}

#[test]
fn test_recomputation_is_idempotent() {
    let wagers = vec![
        WagerBuilder::new("a", "i", LegSlot::A).stake(dec!(33.33)).odds(dec!(2.87)).boost(dec!(12.5)).status(WagerStatus::Won).build(),
        WagerBuilder::new("b", "i", LegSlot::B).stake(dec!(41.7)).odds(dec!(1.93)).lay().status(WagerStatus::Lost).build(),
        WagerBuilder::new("c", "j", LegSlot::A).stake(dec!(10)).odds(dec!(7.0)).freebet().status(WagerStatus::Returned).build(),
    ];

    let first: Vec<_> = cluster(&wagers).iter().map(|g| (group_profit(g), group_roi(g))).collect();
    let second: Vec<_> = cluster(&wagers).iter().map(|g| (group_profit(g), group_roi(g))).collect();
    assert_eq!(first, second);
    assert_eq!(summarize(&cluster(&wagers)), summarize(&cluster(&wagers)));
}

#[test]
fn test_snapshot_to_statistics() {
    let json = r#"[
        {"id": "1", "counterpartyName": "Alpha", "legSlot": "A", "odds": 2.2,
         "stakeField": 100, "potentialReturnField": 220, "mode": "back",
         "status": "won", "eventDate": "2026-05-03", "eventTime": "15:00",
         "groupKey": "k1", "createdAt": "2026-05-01T08:00:00Z"},
        {"id": "2", "counterpartyName": "Beta", "legSlot": "B", "odds": 2.0,
         "stakeField": 100, "potentialReturnField": 200, "mode": "back",
         "status": "lost", "eventDate": "2026-05-03", "eventTime": "15:00",
         "groupKey": "k1", "createdAt": "2026-05-01T08:01:00Z"},
        {"id": "3", "counterpartyName": "Alpha", "legSlot": "A", "odds": 1.8,
         "stakeField": 0, "potentialReturnField": 0, "mode": "back",
         "status": "pending", "eventDate": "2026-06-01", "eventTime": "20:00",
         "createdAt": "2026-05-30T08:00:00Z"}
    ]"#;

    let groups = cluster(&parse_wagers(json).unwrap());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key().group, GroupId::Solo("3".to_string()));

    let totals = stats::overall(&groups);
    assert_eq!(totals.resolved, 1);
    assert_eq!(totals.pending, 1);
    assert_eq!(totals.profit, dec!(20));

    let months = stats::monthly(&groups);
    assert_eq!(months.len(), 2);

    let houses = stats::by_counterparty(&groups);
    assert_eq!(houses["Alpha"].legs, 2);
    assert_eq!(houses["Alpha"].profit, dec!(120));
    assert_eq!(houses["Beta"].profit, dec!(-100));
}
