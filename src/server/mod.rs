//! TCP front end: the accept loop and per-connection task spawning.

pub mod listener;

pub use listener::Server;
