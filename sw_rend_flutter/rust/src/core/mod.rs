//! Core implementation modules for the sw_rend Flutter integration.
//!
//! This module contains the internal implementation details for:
//! - Logging setup
//! - Per-engine plugin state living on the platform thread
//! - Integration with irondash textures

pub mod flutter;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use parking_lot::Mutex;
use sw_rend::{MethodCall, MethodResponse, SwRendPlugin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use flutter::pixel_texture::IrondashRegistry;

/// Environment variable naming the directory for rolling log files.
pub const LOG_DIR_ENV: &str = "SW_REND_LOG_DIR";

pub type EngineHandle = i64;
pub type FlutterPlugin = SwRendPlugin<IrondashRegistry>;

lazy_static::lazy_static! {
    static ref LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);
    static ref WORKER_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(None);
}

thread_local! {
    // irondash textures are bound to the platform thread, so their owners live there too.
    static PLUGINS: RefCell<HashMap<EngineHandle, FlutterPlugin>> = RefCell::new(HashMap::new());
}

pub(crate) fn init_logger() {
    if LOGGER_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let file_layer = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from).map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, "sw_rend.log");
        let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);
        // keep the guard alive for the lifetime of the process so the writer keeps flushing
        WORKER_GUARD.lock().replace(guard);

        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_file_writer)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
    });
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if let Err(err) = result {
        // Another subscriber is already installed, most likely by the host app.
        eprintln!("sw_rend: logger not installed: {err}");
    }

    flutter_rust_bridge::setup_default_user_utils();
    debug!("Done initializing logger");
}

/// Creates the plugin for `engine_handle` unless it already exists. Must run on the platform
/// thread.
pub(crate) fn attach_engine(engine_handle: EngineHandle) -> bool {
    PLUGINS.with_borrow_mut(|plugins| {
        if plugins.contains_key(&engine_handle) {
            return false;
        }
        plugins.insert(
            engine_handle,
            SwRendPlugin::new(IrondashRegistry::new(engine_handle)),
        );
        true
    })
}

/// Drops the plugin for `engine_handle`, releasing all of its textures. Must run on the
/// platform thread.
pub(crate) fn detach_engine(engine_handle: EngineHandle) -> bool {
    // Drop outside the borrow: disposing textures calls back into irondash.
    let plugin = PLUGINS.with_borrow_mut(|plugins| plugins.remove(&engine_handle));
    plugin.is_some()
}

/// Runs `call` against the plugin attached to `engine_handle`. Must run on the platform
/// thread.
pub(crate) fn dispatch(engine_handle: EngineHandle, call: &MethodCall) -> anyhow::Result<MethodResponse> {
    PLUGINS.with_borrow_mut(|plugins| {
        let plugin = plugins
            .get_mut(&engine_handle)
            .ok_or_else(|| anyhow::anyhow!("sw_rend is not initialized for engine {engine_handle}"))?;
        Ok(plugin.handle_method_call(call))
    })
}
