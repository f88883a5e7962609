// Animated particle background for a web page.
//
// A field of drifting particles wraps around the viewport, gets pushed away
// from a recently moved pointer, and is painted with fading edges between
// close neighbours. The simulation and rendering logic is plain Rust and runs
// anywhere; the `web` module binds it to a canvas, requestAnimationFrame and
// window events.

mod utils;

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod physics;
pub mod pointer;
pub mod proximity;
pub mod renderer;
pub mod scheduler;
pub mod store;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::FieldConfig;
pub use error::FieldError;
pub use field::ParticleField;
pub use renderer::{FrameStats, Surface};
pub use scheduler::FrameHost;
pub use store::{Bounds, ParticleStore};
#[cfg(target_arch = "wasm32")]
pub use web::ParticleBackground;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    #[cfg(target_arch = "wasm32")]
    utils::init_logging();
}
