mod app;
mod components;
mod layers_panel;
mod properties_panel;

pub mod config;
pub mod keyboard;
pub mod layers;
pub mod scene;
pub mod sync;
pub mod types;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
