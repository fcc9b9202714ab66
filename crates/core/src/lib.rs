//! Match rules for the wicket spin game. Keep this crate free of IO and platform concerns.

pub mod config;
pub mod events;
pub mod outcome;
pub mod result;
pub mod rng;
pub mod selector;
pub mod session;
pub mod state;

pub use config::*;
pub use events::*;
pub use outcome::*;
pub use result::*;
pub use rng::*;
pub use selector::*;
pub use session::*;
pub use state::*;
