//! Host front ends that feed the engine from a real input device.

mod term;

pub use term::{DriverResult, TermDriver, TermDriverError};
