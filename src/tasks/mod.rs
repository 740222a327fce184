//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the portal is
//! open.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries from every active cache at a
//!   configured interval

mod sweep;

pub use sweep::{spawn_sweep_task, Sweepable};
