//! Shared home-page logic.
//!
//! Lives outside both handler variants so either runtime location can reach
//! it by explicit delegation instead of calling into the other's live
//! instance.

/// Compose the home-page greeting for a visitor name.
pub fn greet(name: &str) -> String {
    format!("Hello from the shared Home logic, {name}")
}
