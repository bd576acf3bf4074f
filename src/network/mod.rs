//! Network layer - catalog loading and endpoint execution
//!
//! The Network actor receives HTTP commands and sends back responses.

pub mod actor;
pub mod client;
pub mod content;

pub use actor::NetworkActor;
