use irondash_run_loop::RunLoop;

/// Runs `f` on the platform main thread and waits for its result.
///
/// Runs inline when already called from the platform thread.
pub fn invoke_on_platform_main_thread<F, T>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let sender = RunLoop::sender_for_main_thread()
        .ok_or_else(|| anyhow::anyhow!("platform main thread run loop is not available"))?;
    Ok(sender.send_and_wait(f))
}
