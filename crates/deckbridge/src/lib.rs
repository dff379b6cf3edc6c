//! Deckbridge - Dual-Runtime Add-in Command Bridge
//!
//! This crate provides the page-session side of a host-application add-in
//! whose logic executes in two runtime locations, including:
//! - Readiness registry and callable bridge handles via `bridge`
//! - Per-runtime registration lifecycle via `bridge::registrar`
//! - Native-host command entry points and the command manifest via `dispatch`
//! - The opaque host collaborator surface via `host`

// Re-export the runtime-location infrastructure
pub use deckbridge_runtime;

// Bridge registry, handles, registrars
pub mod bridge;

// Dispatcher, command surface, manifest
pub mod dispatch;

// Command handlers per runtime location
pub mod handlers;

// Host collaborator surface
pub mod host;

// Configuration
pub mod config;

// Error taxonomy
pub mod types;
