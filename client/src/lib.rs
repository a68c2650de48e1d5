//! Dashboard client crate: Leptos SPA for comparing two LLM configurations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Compiled to WASM with the `csr` feature and served by the API server as
//! static files. Pure state modules under `state/` carry no web dependencies
//! so they test natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
