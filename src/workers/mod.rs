//! Background workers
//!
//! Everything that talks to the API runs here and reports back to the UI
//! through [`crate::events::Event`]s.

pub mod coordinator;
pub mod core;
pub mod editor;
pub mod poller;
pub mod refresher;

pub use coordinator::{Command, Coordinator};
