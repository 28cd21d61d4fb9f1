//! Tests for the filter table and duty-cycle evaluator

use packrat_protocol::MessageId;

use crate::{Decision, FilterError, FilterKind, FilterParams, FilterTable, FILTERS_PER_PACKET};

fn registered(table: &mut FilterTable, raw: u16) -> (MessageId, usize) {
    let mid = MessageId::new(raw);
    let entry = table.register(mid).unwrap();
    (mid, entry)
}

// ============================================================================
// Duty-cycle algorithm
// ============================================================================

#[test]
fn test_admit_pattern_n2_x5_o0() {
    let mut table = FilterTable::with_capacity(4);
    let (mid, entry) = registered(&mut table, 0x08A1);
    table.set_params(mid, 0, FilterParams::new(2, 5, 0)).unwrap();

    let decisions: Vec<_> = (0..10)
        .map(|_| table.evaluate(entry, 0, 0).unwrap())
        .collect();

    use Decision::{Admit, Drop};
    assert_eq!(
        decisions,
        vec![Admit, Admit, Drop, Drop, Drop, Admit, Admit, Drop, Drop, Drop]
    );
}

#[test]
fn test_duty_cycle_admits_n_of_every_x() {
    // For all valid (N, X, O) in a small grid and several starting counts,
    // every window of X consecutive evaluations admits exactly N packets.
    for x in 1..=8u16 {
        for n in 0..=x {
            for o in 0..x {
                for skip in [0u32, 1, 3, 7] {
                    let mut table = FilterTable::with_capacity(1);
                    let (mid, entry) = registered(&mut table, 0x0100);
                    table.set_params(mid, 0, FilterParams::new(n, x, o)).unwrap();

                    // Advance the counter to an arbitrary phase first
                    for _ in 0..skip {
                        table.evaluate(entry, 0, 0).unwrap();
                    }

                    let window: Vec<_> = (0..x)
                        .map(|_| table.evaluate(entry, 0, 0).unwrap())
                        .collect();
                    let admitted = window.iter().filter(|d| d.is_admit()).count();
                    assert_eq!(
                        admitted,
                        usize::from(n),
                        "N={n} X={x} O={o} skip={skip}: window admitted {admitted}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_duty_cycle_is_periodic() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(3, 7, 2)).unwrap();

    let first: Vec<_> = (0..7).map(|_| table.evaluate(entry, 0, 0).unwrap()).collect();
    let second: Vec<_> = (0..7).map(|_| table.evaluate(entry, 0, 0).unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_phase_offset_shifts_pattern() {
    let mut table = FilterTable::with_capacity(2);
    let (plain, plain_entry) = registered(&mut table, 0x0100);
    let (shifted, shifted_entry) = registered(&mut table, 0x0200);
    table.set_params(plain, 0, FilterParams::new(1, 4, 0)).unwrap();
    table.set_params(shifted, 0, FilterParams::new(1, 4, 2)).unwrap();

    let plain_pattern: Vec<_> = (0..4)
        .map(|_| table.evaluate(plain_entry, 0, 0).unwrap())
        .collect();
    let shifted_pattern: Vec<_> = (0..4)
        .map(|_| table.evaluate(shifted_entry, 0, 0).unwrap())
        .collect();

    use Decision::{Admit, Drop};
    assert_eq!(plain_pattern, vec![Admit, Drop, Drop, Drop]);
    assert_eq!(shifted_pattern, vec![Drop, Drop, Admit, Drop]);
}

#[test]
fn test_by_time_uses_packet_timestamp() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_kind(mid, 0, FilterKind::ByTime).unwrap();
    // Admit during the first 2 seconds of every 10-second block
    table.set_params(mid, 0, FilterParams::new(2, 10, 0)).unwrap();

    assert_eq!(table.evaluate(entry, 0, 0).unwrap(), Decision::Admit);
    assert_eq!(table.evaluate(entry, 0, 1).unwrap(), Decision::Admit);
    assert_eq!(table.evaluate(entry, 0, 5).unwrap(), Decision::Drop);
    assert_eq!(table.evaluate(entry, 0, 11).unwrap(), Decision::Admit);
    assert_eq!(table.evaluate(entry, 0, 19).unwrap(), Decision::Drop);
}

#[test]
fn test_counter_wraps_without_panic() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(1, 3, 2)).unwrap();

    table.force_count(entry, 0, u32::MAX);
    // (MAX + 2) wraps; the evaluation must stay deterministic, not panic
    table.evaluate(entry, 0, 0).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 0);
    table.evaluate(entry, 0, 0).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 1);
}

#[test]
fn test_default_slot_drops_everything() {
    let mut table = FilterTable::with_capacity(1);
    let (_, entry) = registered(&mut table, 0x0100);

    for _ in 0..5 {
        for slot in 0..FILTERS_PER_PACKET {
            assert_eq!(table.evaluate(entry, slot, 0).unwrap(), Decision::Drop);
        }
    }
}

#[test]
fn test_slots_evaluate_independently() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(1, 2, 0)).unwrap();
    table.set_params(mid, 1, FilterParams::new(1, 3, 0)).unwrap();

    // Slot 0 cycles at period 2, slot 1 at period 3 - no cross-talk
    let slot0: Vec<_> = (0..6).map(|_| table.evaluate(entry, 0, 0).unwrap()).collect();
    let slot1: Vec<_> = (0..6).map(|_| table.evaluate(entry, 1, 0).unwrap()).collect();

    use Decision::{Admit, Drop};
    assert_eq!(slot0, vec![Admit, Drop, Admit, Drop, Admit, Drop]);
    assert_eq!(slot1, vec![Admit, Drop, Drop, Admit, Drop, Drop]);
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_duplicate_leaves_table_unchanged() {
    let mut table = FilterTable::with_capacity(4);
    let (mid, entry) = registered(&mut table, 0x08A1);
    table.set_params(mid, 0, FilterParams::new(1, 2, 0)).unwrap();

    let err = table.register(mid).unwrap_err();
    assert_eq!(err, FilterError::already_registered(mid, entry));

    // Slot configuration survived the failed registration
    assert_eq!(table.lookup(mid), Some(entry));
    assert_eq!(
        table.entry(entry).unwrap().slots()[0].params,
        FilterParams::new(1, 2, 0)
    );
    assert_eq!(table.registered(), 1);
}

#[test]
fn test_register_into_only_free_entry() {
    // Fill every entry except index 3, then register into the hole
    let mut table = FilterTable::with_capacity(5);
    for raw in [0x0100u16, 0x0200, 0x0300] {
        table.register(MessageId::new(raw)).unwrap();
    }
    let hole = table.register(MessageId::new(0x0AB1)).unwrap();
    assert_eq!(hole, 3);
    table.register(MessageId::new(0x0400)).unwrap();

    // Remove the MID at entry 3 and re-register: lands back at 3
    table.unregister(MessageId::new(0x0AB1)).unwrap();
    assert_eq!(table.register(MessageId::new(0x0AB1)).unwrap(), 3);
    assert_eq!(table.lookup(MessageId::new(0x0AB1)), Some(3));

    // Table is now full
    let err = table.register(MessageId::new(0x0500)).unwrap_err();
    assert_eq!(err, FilterError::TableFull { capacity: 5 });
    assert_eq!(table.registered(), 5);
    assert_eq!(table.lookup(MessageId::new(0x0500)), None);
}

#[test]
fn test_unregister_absent_fails() {
    let mut table = FilterTable::with_capacity(4);
    let err = table.unregister(MessageId::new(0x0BAD)).unwrap_err();
    assert_eq!(err, FilterError::not_registered(MessageId::new(0x0BAD)));
}

#[test]
fn test_unregister_removes_and_index_rebuild_finds_rest() {
    let mut table = FilterTable::with_capacity(8);
    let mids: Vec<_> = (1..=5u16).map(MessageId::new).collect();
    for &mid in &mids {
        table.register(mid).unwrap();
    }

    table.unregister(mids[2]).unwrap();

    assert_eq!(table.lookup(mids[2]), None);
    for (position, &mid) in mids.iter().enumerate() {
        if position == 2 {
            continue;
        }
        assert_eq!(table.lookup(mid), Some(position), "lost {mid} after rebuild");
    }
    assert_eq!(table.registered(), 4);
}

#[test]
fn test_unregister_resets_entry_defaults() {
    let mut table = FilterTable::with_capacity(2);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(2, 4, 1)).unwrap();
    table.set_destination(mid, 0, 7).unwrap();
    table.evaluate(entry, 0, 0).unwrap();

    table.unregister(mid).unwrap();
    table.register(mid).unwrap();

    let fresh = table.entry(entry).unwrap();
    assert_eq!(fresh.slots()[0].params, FilterParams::DROP_ALL);
    assert_eq!(fresh.slots()[0].dest, 0);
    assert_eq!(fresh.count(0), 0);
}

// ============================================================================
// Slot mutation policy
// ============================================================================

#[test]
fn test_set_params_preserves_running_count() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(1, 2, 0)).unwrap();

    for _ in 0..3 {
        table.evaluate(entry, 0, 0).unwrap();
    }
    assert_eq!(table.entry(entry).unwrap().count(0), 3);

    table.set_params(mid, 0, FilterParams::new(1, 4, 0)).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 3);

    // Next evaluation continues from counter 3: (3 + 0) % 4 = 3, drop
    assert_eq!(table.evaluate(entry, 0, 0).unwrap(), Decision::Drop);
}

#[test]
fn test_set_kind_preserves_running_count() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::PASS_ALL).unwrap();
    table.evaluate(entry, 0, 0).unwrap();

    table.set_kind(mid, 0, FilterKind::ByTime).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 1);
}

#[test]
fn test_set_destination_resets_running_count() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);
    table.set_params(mid, 0, FilterParams::new(1, 2, 0)).unwrap();
    for _ in 0..3 {
        table.evaluate(entry, 0, 0).unwrap();
    }

    table.set_destination(mid, 0, 2).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 0);
    assert_eq!(table.entry(entry).unwrap().slots()[0].dest, 2);

    // Same destination again is a no-op: count keeps advancing
    table.evaluate(entry, 0, 0).unwrap();
    table.set_destination(mid, 0, 2).unwrap();
    assert_eq!(table.entry(entry).unwrap().count(0), 1);
}

#[test]
fn test_set_params_rejects_invariant_violations() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, _) = registered(&mut table, 0x0100);

    for bad in [
        FilterParams::new(1, 0, 0), // X must be > 0
        FilterParams::new(3, 2, 0), // N must be <= X
        FilterParams::new(1, 2, 2), // O must be < X
    ] {
        let err = table.set_params(mid, 0, bad).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParams { .. }), "{bad:?}");
    }

    // Boundary cases that are valid
    table.set_params(mid, 0, FilterParams::new(2, 2, 1)).unwrap();
    table.set_params(mid, 0, FilterParams::new(0, 1, 0)).unwrap();
}

#[test]
fn test_slot_index_out_of_range() {
    let mut table = FilterTable::with_capacity(1);
    let (mid, entry) = registered(&mut table, 0x0100);

    let err = table
        .set_params(mid, FILTERS_PER_PACKET, FilterParams::PASS_ALL)
        .unwrap_err();
    assert_eq!(err, FilterError::invalid_slot(FILTERS_PER_PACKET, FILTERS_PER_PACKET));

    let err = table.evaluate(entry, FILTERS_PER_PACKET, 0).unwrap_err();
    assert_eq!(err, FilterError::invalid_slot(FILTERS_PER_PACKET, FILTERS_PER_PACKET));
}

#[test]
fn test_evaluate_entry_out_of_range() {
    let mut table = FilterTable::with_capacity(2);
    let err = table.evaluate(2, 0, 0).unwrap_err();
    assert_eq!(err, FilterError::InvalidEntry { index: 2, len: 2 });
}

#[test]
fn test_mids_iterates_registered_only() {
    let mut table = FilterTable::with_capacity(4);
    table.register(MessageId::new(0x0100)).unwrap();
    table.register(MessageId::new(0x0200)).unwrap();
    table.unregister(MessageId::new(0x0100)).unwrap();

    let mids: Vec<_> = table.mids().collect();
    assert_eq!(mids, vec![MessageId::new(0x0200)]);
}
