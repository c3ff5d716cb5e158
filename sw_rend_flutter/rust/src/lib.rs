//! Flutter bindings for sw_rend: irondash pixel-buffer textures driven through
//! flutter_rust_bridge.

pub mod api;
mod core;
mod utils;
