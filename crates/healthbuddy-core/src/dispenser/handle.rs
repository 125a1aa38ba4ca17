//! Timer-driven dispenser handle owned by the presentation layer.
//!
//! [`Dispenser`] wraps a [`DispenserSimulator`] and arms the delayed half of
//! each transition on an injected [`Scheduler`]. Callbacks hold only a weak
//! reference, so once the handle is dropped a pending timer does nothing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rand::RngCore;
use rand_pcg::Mcg128Xsl64;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};

use super::scheduler::Scheduler;
use super::simulator::{DispenserSimulator, PendingTransition, Ticket};
use super::status::{ConnectionStatus, DispensedItem, DispenserSnapshot, DispenserTimings};
use crate::error::DispenserError;
use crate::events::Event;

const EVENT_CAPACITY: usize = 16;

struct Shared<R> {
    sim: Mutex<DispenserSimulator<R>>,
    snapshots: watch::Sender<DispenserSnapshot>,
    events: broadcast::Sender<Event>,
}

impl<R: RngCore> Shared<R> {
    fn lock(&self) -> MutexGuard<'_, DispenserSimulator<R>> {
        self.sim.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish while still holding the simulator lock so subscribers see
    /// snapshots in transition order.
    fn publish(&self, sim: &DispenserSimulator<R>, event: &Event) {
        self.snapshots.send_replace(sim.snapshot());
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
    }

    fn fire(&self, ticket: Ticket) {
        let mut sim = self.lock();
        if let Some(event) = sim.complete(ticket) {
            self.publish(&sim, &event);
        }
    }
}

/// One dispenser session. Create it when the dispenser screen opens and drop
/// it when the screen closes.
pub struct Dispenser<R = Mcg128Xsl64> {
    shared: Arc<Shared<R>>,
    scheduler: Arc<dyn Scheduler>,
}

impl Dispenser<Mcg128Xsl64> {
    pub fn new(timings: DispenserTimings, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_simulator(DispenserSimulator::new(timings), scheduler)
    }

    pub fn with_seed(timings: DispenserTimings, seed: u64, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_simulator(DispenserSimulator::with_seed(timings, seed), scheduler)
    }
}

impl<R: RngCore + Send + 'static> Dispenser<R> {
    pub fn with_simulator(sim: DispenserSimulator<R>, scheduler: Arc<dyn Scheduler>) -> Self {
        let (snapshots, _) = watch::channel(sim.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                sim: Mutex::new(sim),
                snapshots,
                events,
            }),
            scheduler,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        self.shared.lock().status()
    }

    pub fn dispensed_item(&self) -> Option<DispensedItem> {
        self.shared.lock().dispensed_item().cloned()
    }

    pub fn snapshot(&self) -> DispenserSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn snapshot_event(&self) -> Event {
        self.shared.lock().snapshot_event()
    }

    /// Latest snapshot, updated on every transition.
    pub fn subscribe(&self) -> watch::Receiver<DispenserSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Every event from now on, including the timed completions.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Resolve once the dispenser reaches `status`.
    ///
    /// A reset ends the wait early with the `Disconnected` snapshot, so check
    /// the returned status when another task may reset the session.
    pub async fn wait_for(&self, status: ConnectionStatus) -> DispenserSnapshot {
        let settled = |s: ConnectionStatus| s == status || s == ConnectionStatus::Disconnected;

        // Subscribe before reading so no transition slips between the two.
        let mut events = self.subscribe_events();
        let current = self.snapshot();
        if current.status == status {
            return current;
        }
        loop {
            match events.recv().await {
                Ok(event) if settled(event.status_after()) => return snapshot_after(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "wait_for lagged, rereading state");
                    let current = self.snapshot();
                    if settled(current.status) {
                        return current;
                    }
                }
                // The sender lives as long as `self`.
                Err(RecvError::Closed) => return self.snapshot(),
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn connect(&self) -> Result<Event, DispenserError> {
        let mut sim = self.shared.lock();
        let (event, pending) = sim.connect()?;
        self.shared.publish(&sim, &event);
        drop(sim);
        self.arm(pending);
        Ok(event)
    }

    pub fn dispense(&self) -> Result<Event, DispenserError> {
        let mut sim = self.shared.lock();
        let (event, pending) = sim.dispense()?;
        self.shared.publish(&sim, &event);
        drop(sim);
        self.arm(pending);
        Ok(event)
    }

    /// "Return to dashboard": back to `Disconnected`, pending timer disarmed.
    pub fn reset(&self) -> Event {
        let mut sim = self.shared.lock();
        let event = sim.reset();
        self.shared.publish(&sim, &event);
        event
    }

    fn arm(&self, pending: PendingTransition) {
        let weak: Weak<Shared<R>> = Arc::downgrade(&self.shared);
        self.scheduler.schedule(
            pending.delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.fire(pending.ticket);
                } else {
                    tracing::debug!("dispenser dropped before timer fired");
                }
            }),
        );
    }
}

fn snapshot_after(event: Event) -> DispenserSnapshot {
    match event {
        Event::DispenseCompleted { item, .. } => DispenserSnapshot {
            status: ConnectionStatus::Complete,
            dispensed_item: Some(item),
        },
        Event::StateSnapshot {
            status,
            dispensed_item,
            ..
        } => DispenserSnapshot {
            status,
            dispensed_item,
        },
        other => DispenserSnapshot {
            status: other.status_after(),
            dispensed_item: None,
        },
    }
}

impl<R> std::fmt::Debug for Dispenser<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispenser")
            .field("snapshot", &*self.shared.snapshots.borrow())
            .finish_non_exhaustive()
    }
}
