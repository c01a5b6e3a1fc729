//! Animated Voronoi backdrop for a canvas element.
//!
//! The geometry, animation and paint logic are plain Rust and build on any
//! target; only the browser glue in `wasm` needs `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod animation;
pub mod backdrop;
pub mod config;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod resize;
pub mod rng;
pub mod site;
pub mod spatial;

pub use backdrop::{Backdrop, Event, FrameOutcome, FrameScheduler};
pub use config::{Config, Rgb};
pub use diagram::Diagram;
pub use error::{BackdropError, ConfigError};
pub use paint::{Fill, Surface};
pub use resize::Dimensions;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod render;

    pub use dom::{measure, mount, CANVAS_ID, CONTAINER_ID, TOGGLE_ID};
    pub use render::{install, CanvasSurface, RafScheduler, SharedStage, Stage};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        // A page without the backdrop elements simply gets no backdrop.
        if let Err(err) = mount() {
            log::error!("voronoi backdrop disabled: {err}");
        }
        Ok(())
    }
}
