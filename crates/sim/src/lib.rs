//! Headless batch play over the core match session.

mod config;
mod error;
mod simulator;
mod trace;

pub use config::*;
pub use error::*;
pub use simulator::*;
pub use trace::*;
