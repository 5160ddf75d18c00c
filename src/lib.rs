// cargo: dep = "yew"
// cargo: dep = "serde"
// cargo: dep = "serde_json"
// cargo: dep = "reqwest"
// cargo: dep = "pulldown-cmark"
// cargo: dep = "futures-util"
// cargo: dep = "wasm-bindgen"
// cargo: dep = "wasm-bindgen-futures"
// cargo: dep = "web-sys"
// cargo: dep = "uuid"
// cargo: dep = "anyhow"
// cargo: dep = "thiserror"
// cargo: dep = "console_error_panic_hook"
// cargo: dep = "tiktoken-rs"
// cargo: dep = "log"
// cargo: dep = "chrono"
// cargo: dep = "percent-encoding"

mod app;
mod components;
pub mod models;
pub mod registry;
pub mod services;
pub mod state;
mod utils;

use wasm_bindgen::prelude::*;
use app::App;

#[wasm_bindgen(start)]
pub fn run_app() {
    utils::set_panic_hook();
    utils::init_logging();
    log::info!("Starting Doli Assistant v{}", env!("CARGO_PKG_VERSION"));
    yew::Renderer::<App>::new().render();
}
