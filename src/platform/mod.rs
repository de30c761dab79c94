//! Platform bindings
//!
//! The browser build exposes the game to JavaScript through `web`; native
//! hosts drive [`crate::sim::Simulation`] directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;
