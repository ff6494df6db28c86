//! Request queue tests.
//!
//! Test organization:
//! - replay.rs: ordering and exactly-once replay
//! - events.rs: event callbacks

mod events;
mod replay;
