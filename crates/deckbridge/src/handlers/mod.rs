//! Command handlers, one per runtime location.
//!
//! Each variant owns its set of named operations; `whoami` is deliberately
//! exposed by both and answers for its own location. Handlers never touch the
//! registry; only the registrar does.

mod client;
mod server;

pub mod home;

pub use client::ClientCommandHandler;
pub use server::ServerCommandHandler;
