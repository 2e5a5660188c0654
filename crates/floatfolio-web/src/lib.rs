#![forbid(unsafe_code)]

//! WASM runner for the Floatfolio portfolio page.
//!
//! This crate provides [`PortfolioRunner`], a `wasm-bindgen`-exported struct
//! that wraps `floatfolio_core::Simulation` and exposes it to JavaScript for
//! host-driven execution. The page owns the `requestAnimationFrame` loop and
//! the DOM; the runner owns every piece of interaction state.
//!
//! Input events are JSON objects tagged by `kind`:
//!
//! ```json
//! {"kind": "pointer", "x": 120.0, "y": 80.0}
//! {"kind": "touch", "phase": "start", "x": 200.0, "y": 400.0}
//! {"kind": "orientation", "beta": 12.5, "gamma": -4.0}
//! ```

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
