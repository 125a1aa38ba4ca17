//! End-to-end dispenser sessions on a virtual clock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use healthbuddy_core::dispenser::{catalog, CATALOG};
use healthbuddy_core::{
    Config, ConnectionStatus, Dispenser, DispenserError, DispenserTimings, Event, ManualScheduler,
};

const CATALOG_NAMES: [&str; 4] = ["Vitamin D", "Magnesium", "Multivitamin", "Omega-3"];

fn session(seed: u64) -> (Dispenser, ManualScheduler) {
    let sched = ManualScheduler::new();
    let dispenser =
        Dispenser::with_seed(DispenserTimings::default(), seed, Arc::new(sched.clone()));
    (dispenser, sched)
}

#[test]
fn test_connect_wait_dispense_wait() {
    let (dispenser, sched) = session(2024);

    let event = dispenser.connect().unwrap();
    assert!(matches!(event, Event::ScanStarted { delay_ms: 2000, .. }));
    sched.advance(Duration::from_millis(2000));
    assert_eq!(dispenser.status(), ConnectionStatus::Connected);

    let event = dispenser.dispense().unwrap();
    assert!(matches!(event, Event::DispenseStarted { delay_ms: 3000, .. }));
    sched.advance(Duration::from_millis(3000));

    let snap = dispenser.snapshot();
    assert_eq!(snap.status, ConnectionStatus::Complete);
    let item = snap.dispensed_item.unwrap();
    assert!(CATALOG_NAMES.contains(&item.name.as_str()));
    assert!(catalog().contains(&item));
    assert_eq!(sched.now(), Duration::from_millis(5000));
}

fn assert_both_rejected(dispenser: &Dispenser, status: ConnectionStatus) {
    assert_eq!(dispenser.status(), status);
    assert!(matches!(
        dispenser.connect(),
        Err(DispenserError::InvalidTransition { .. })
    ));
    assert!(matches!(
        dispenser.dispense(),
        Err(DispenserError::InvalidTransition { .. })
    ));
    assert_eq!(dispenser.status(), status);
}

#[test]
fn test_rejections_leave_status_alone() {
    let (dispenser, sched) = session(1);

    assert!(dispenser.dispense().is_err());
    assert_eq!(dispenser.status(), ConnectionStatus::Disconnected);

    dispenser.connect().unwrap();
    assert_both_rejected(&dispenser, ConnectionStatus::Scanning);
    // Only the first connect armed a timer.
    assert_eq!(sched.pending(), 1);

    sched.advance(Duration::from_secs(2));
    assert!(dispenser.connect().is_err());
    assert_eq!(dispenser.status(), ConnectionStatus::Connected);

    dispenser.dispense().unwrap();
    assert_both_rejected(&dispenser, ConnectionStatus::Dispensing);

    sched.advance(Duration::from_secs(3));
    assert_both_rejected(&dispenser, ConnectionStatus::Complete);
    assert_eq!(sched.pending(), 0);
}

#[test]
fn test_reset_from_any_status() {
    for stop_after in 0..5u32 {
        let (dispenser, sched) = session(stop_after as u64);
        if stop_after >= 1 {
            dispenser.connect().unwrap();
        }
        if stop_after >= 2 {
            sched.advance(Duration::from_secs(2));
        }
        if stop_after >= 3 {
            dispenser.dispense().unwrap();
        }
        if stop_after >= 4 {
            sched.advance(Duration::from_secs(3));
        }

        dispenser.reset();
        sched.advance(Duration::from_secs(10));
        assert_eq!(dispenser.status(), ConnectionStatus::Disconnected);
        assert!(dispenser.dispensed_item().is_none());
    }
}

#[test]
fn test_thousand_dispenses_cover_catalog_evenly() {
    let (dispenser, sched) = session(42);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..1000 {
        dispenser.connect().unwrap();
        sched.advance(Duration::from_secs(2));
        dispenser.dispense().unwrap();
        sched.advance(Duration::from_secs(3));
        let item = dispenser.dispensed_item().unwrap();
        *counts.entry(item.name).or_default() += 1;
        dispenser.reset();
    }

    assert_eq!(counts.len(), CATALOG.len());
    for (name, count) in &counts {
        assert!((175..=325).contains(count), "{name} dispensed {count} times");
    }
}

#[test]
fn test_config_timings_drive_session() {
    let mut cfg = Config::default();
    cfg.set("dispenser.scan_delay_ms", "10").unwrap();
    cfg.set("dispenser.dispense_delay_ms", "20").unwrap();

    let sched = ManualScheduler::new();
    let dispenser = Dispenser::with_seed(cfg.timings(), 9, Arc::new(sched.clone()));

    dispenser.connect().unwrap();
    sched.advance(Duration::from_millis(10));
    dispenser.dispense().unwrap();
    sched.advance(Duration::from_millis(20));
    assert_eq!(dispenser.status(), ConnectionStatus::Complete);
}
