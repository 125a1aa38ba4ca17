mod handle;
mod scheduler;
mod simulator;
mod status;

pub use handle::Dispenser;
pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
pub use simulator::{DispenserSimulator, PendingTransition, Ticket, TransitionKind};
pub use status::{
    catalog, ConnectionStatus, DispensedItem, DispenserSnapshot, DispenserTimings, CATALOG,
};
