//! Background loops the runtime spawns next to the character schedulers.

mod cleanup;
mod policy;

pub use cleanup::ReservationCleanup;
pub use policy::PolicyWorker;
