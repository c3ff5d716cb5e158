//! Main API for the sw_rend Flutter integration.
//!
//! Every function takes the handle of the Flutter engine that owns the textures. Calls are
//! marshalled onto the platform thread, where the per-engine plugin lives, and go through the
//! same method-call dispatch the platform channel uses.

use std::sync::atomic::{AtomicBool, Ordering};

use flutter_rust_bridge::frb;
use log::{debug, info};
use sw_rend::{MethodCall, Value};

use crate::api::dart_types::{MethodArguments, MethodResult, TextureSize};
use crate::core;
use crate::utils::invoke_on_platform_main_thread;

lazy_static::lazy_static! {
    static ref IS_INITIALIZED: AtomicBool = AtomicBool::new(false);
}

#[frb(init)]
pub fn init_app() {
    core::init_logger();
}

/// Initialize the plugin for an engine. The FFI pointer is consumed once per process.
pub fn sw_rend_init(ffi_ptr: i64, engine_handle: i64) -> anyhow::Result<()> {
    if !IS_INITIALIZED.swap(true, Ordering::SeqCst) {
        irondash_dart_ffi::irondash_init_ffi(ffi_ptr as *mut std::ffi::c_void);
        debug!("Initialized irondash FFI");
    }

    if invoke_on_platform_main_thread(move || core::attach_engine(engine_handle))? {
        info!("sw_rend attached to engine {engine_handle}");
    }
    Ok(())
}

/// Releases every texture of an engine.
pub fn sw_rend_shutdown(engine_handle: i64) -> anyhow::Result<()> {
    if invoke_on_platform_main_thread(move || core::detach_engine(engine_handle))? {
        info!("sw_rend detached from engine {engine_handle}");
    }
    Ok(())
}

/// Generic entry point mirroring the `com.funguscow/sw_rend` method channel.
pub fn handle_method_call(
    engine_handle: i64,
    method: String,
    arguments: MethodArguments,
) -> anyhow::Result<MethodResult> {
    call(engine_handle, arguments.into_call(method))?.try_into()
}

/// Creates a zero-filled texture and returns its handle.
pub fn create_texture(engine_handle: i64, width: i64, height: i64) -> anyhow::Result<i64> {
    let value = call(
        engine_handle,
        MethodCall::new("init")
            .with_argument("width", width)
            .with_argument("height", height),
    )?;
    int_result(value)
}

/// Copies a rectangle of RGBA pixels into a texture. Unset coordinates default to the whole
/// texture.
pub fn draw_texture(
    engine_handle: i64,
    texture: i64,
    pixels: Vec<u8>,
    x: Option<i64>,
    y: Option<i64>,
    width: Option<i64>,
    height: Option<i64>,
) -> anyhow::Result<()> {
    let arguments = MethodArguments {
        texture: Some(texture),
        width,
        height,
        x,
        y,
        pixels: Some(pixels),
    };
    call(engine_handle, arguments.into_call("draw".to_owned()))?;
    Ok(())
}

/// Asks Flutter to repaint a texture from its current pixels.
pub fn invalidate_texture(engine_handle: i64, texture: i64) -> anyhow::Result<()> {
    call(engine_handle, texture_call("invalidate", texture))?;
    Ok(())
}

/// Copy of the texture's pixels.
pub fn get_pixels(engine_handle: i64, texture: i64) -> anyhow::Result<Vec<u8>> {
    match call(engine_handle, texture_call("get_pixels", texture))? {
        Value::Uint8List(pixels) => Ok(pixels),
        other => anyhow::bail!("unexpected pixel result {other:?}"),
    }
}

pub fn get_size(engine_handle: i64, texture: i64) -> anyhow::Result<TextureSize> {
    match call(engine_handle, texture_call("get_size", texture))? {
        Value::Int32List(size) if size.len() == 2 => Ok(TextureSize {
            width: u32::try_from(size[0])?,
            height: u32::try_from(size[1])?,
        }),
        other => anyhow::bail!("unexpected size result {other:?}"),
    }
}

/// Flutter texture id to pass to the `Texture` widget.
pub fn get_texture_id(engine_handle: i64, texture: i64) -> anyhow::Result<i64> {
    int_result(call(engine_handle, texture_call("get_texture_id", texture))?)
}

pub fn dispose_texture(engine_handle: i64, texture: i64) -> anyhow::Result<()> {
    call(engine_handle, texture_call("dispose", texture))?;
    Ok(())
}

/// Handles of all live textures of an engine, ascending.
pub fn list_textures(engine_handle: i64) -> anyhow::Result<Vec<i64>> {
    match call(engine_handle, MethodCall::new("list_textures"))? {
        Value::Int64List(handles) => Ok(handles),
        other => anyhow::bail!("unexpected list result {other:?}"),
    }
}

fn texture_call(method: &str, texture: i64) -> MethodCall {
    MethodCall::new(method).with_argument("texture", texture)
}

fn int_result(value: Value) -> anyhow::Result<i64> {
    value
        .as_int()
        .ok_or_else(|| anyhow::anyhow!("expected an integer result, got {value:?}"))
}

fn call(engine_handle: i64, call: MethodCall) -> anyhow::Result<Value> {
    let response = invoke_on_platform_main_thread(move || core::dispatch(engine_handle, &call))??;
    Ok(response.into_result()?)
}
