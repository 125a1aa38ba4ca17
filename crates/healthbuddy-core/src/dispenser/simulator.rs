//! Dispenser connection simulator.
//!
//! A synchronous state machine in the style of a tick-driven engine: it holds
//! no timers itself. `connect()` and `dispense()` move the status immediately
//! and hand back a [`PendingTransition`] describing the delayed half of the
//! transition. Whoever owns the clock calls [`DispenserSimulator::complete`]
//! with that ticket once the delay has elapsed.
//!
//! ## State Transitions
//!
//! ```text
//! Disconnected -connect()-> Scanning -(scan delay)-> Connected
//! Connected -dispense()-> Dispensing -(dispense delay)-> Complete
//! any -reset()-> Disconnected
//! ```
//!
//! At most one transition is pending. Tickets are never reused, so a ticket
//! that outlived a `reset()` is ignored.

use std::time::Duration;

use chrono::Utc;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info};

use super::status::{
    ConnectionStatus, DispensedItem, DispenserSnapshot, DispenserTimings, CATALOG,
};
use crate::error::{DispenserError, DispenserOperation};
use crate::events::Event;

/// Identifies one scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// `Scanning -> Connected`
    ScanComplete,
    /// `Dispensing -> Complete`
    DispenseComplete,
}

/// Delayed half of a transition, to be completed after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub ticket: Ticket,
    pub kind: TransitionKind,
    pub delay: Duration,
}

/// Owned dispenser state. Generic over the random source so tests can seed it.
#[derive(Debug)]
pub struct DispenserSimulator<R = Mcg128Xsl64> {
    status: ConnectionStatus,
    dispensed_item: Option<DispensedItem>,
    pending: Option<PendingTransition>,
    next_ticket: u64,
    timings: DispenserTimings,
    rng: R,
}

impl DispenserSimulator<Mcg128Xsl64> {
    /// Simulator seeded from OS entropy.
    pub fn new(timings: DispenserTimings) -> Self {
        Self::with_rng(timings, Mcg128Xsl64::from_entropy())
    }

    /// Reproducible simulator.
    pub fn with_seed(timings: DispenserTimings, seed: u64) -> Self {
        Self::with_rng(timings, Mcg128Xsl64::seed_from_u64(seed))
    }
}

impl<R: RngCore> DispenserSimulator<R> {
    pub fn with_rng(timings: DispenserTimings, rng: R) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            dispensed_item: None,
            pending: None,
            next_ticket: 0,
            timings,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn dispensed_item(&self) -> Option<&DispensedItem> {
        self.dispensed_item.as_ref()
    }

    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub fn timings(&self) -> DispenserTimings {
        self.timings
    }

    pub fn snapshot(&self) -> DispenserSnapshot {
        DispenserSnapshot {
            status: self.status,
            dispensed_item: self.dispensed_item.clone(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            dispensed_item: self.dispensed_item.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `Disconnected -> Scanning`. The returned transition leads to `Connected`.
    pub fn connect(&mut self) -> Result<(Event, PendingTransition), DispenserError> {
        self.require(DispenserOperation::Connect, ConnectionStatus::Disconnected)?;
        self.status = ConnectionStatus::Scanning;
        let pending = self.schedule(TransitionKind::ScanComplete, self.timings.scan_delay);
        info!(delay_ms = pending.delay.as_millis() as u64, "scanning for dispenser");
        Ok((
            Event::ScanStarted {
                delay_ms: pending.delay.as_millis() as u64,
                at: Utc::now(),
            },
            pending,
        ))
    }

    /// `Connected -> Dispensing`. The returned transition leads to `Complete`.
    pub fn dispense(&mut self) -> Result<(Event, PendingTransition), DispenserError> {
        self.require(DispenserOperation::Dispense, ConnectionStatus::Connected)?;
        self.status = ConnectionStatus::Dispensing;
        let pending = self.schedule(
            TransitionKind::DispenseComplete,
            self.timings.dispense_delay,
        );
        info!(delay_ms = pending.delay.as_millis() as u64, "dispensing supplement");
        Ok((
            Event::DispenseStarted {
                delay_ms: pending.delay.as_millis() as u64,
                at: Utc::now(),
            },
            pending,
        ))
    }

    /// Finish the pending transition. Returns `None` if `ticket` is stale.
    pub fn complete(&mut self, ticket: Ticket) -> Option<Event> {
        let pending = match self.pending {
            Some(p) if p.ticket == ticket => p,
            _ => {
                debug!(?ticket, "ignoring stale dispenser transition");
                return None;
            }
        };
        self.pending = None;

        match pending.kind {
            TransitionKind::ScanComplete => {
                self.status = ConnectionStatus::Connected;
                info!("dispenser connected");
                Some(Event::Connected { at: Utc::now() })
            }
            TransitionKind::DispenseComplete => {
                let item = self.pick_item();
                info!(name = %item.name, amount = %item.amount, "supplement dispensed");
                self.dispensed_item = Some(item.clone());
                self.status = ConnectionStatus::Complete;
                Some(Event::DispenseCompleted {
                    item,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Back to `Disconnected` from any status, dropping the pending transition.
    pub fn reset(&mut self) -> Event {
        let from = self.status;
        self.status = ConnectionStatus::Disconnected;
        self.dispensed_item = None;
        self.pending = None;
        debug!(%from, "dispenser reset");
        Event::Reset {
            from,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(
        &self,
        operation: DispenserOperation,
        expected: ConnectionStatus,
    ) -> Result<(), DispenserError> {
        if self.status == expected {
            return Ok(());
        }
        debug!(%operation, status = %self.status, "rejected dispenser operation");
        Err(DispenserError::InvalidTransition {
            operation,
            status: self.status,
        })
    }

    fn schedule(&mut self, kind: TransitionKind, delay: Duration) -> PendingTransition {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let pending = PendingTransition {
            ticket,
            kind,
            delay,
        };
        self.pending = Some(pending);
        pending
    }

    fn pick_item(&mut self) -> DispensedItem {
        let (name, amount) = CATALOG[self.rng.gen_range(0..CATALOG.len())];
        DispensedItem::new(name, amount)
    }
}
