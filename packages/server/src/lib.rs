//! Planning poker room synchronization server library.
//!
//! This library provides the authoritative room state, the fan-out of
//! state-changing events to all connected viewers of a room, and the
//! WebSocket/HTTP surfaces wrapping them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
