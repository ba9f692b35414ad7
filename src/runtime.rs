use std::future::Future;

use once_cell::sync::OnceCell;
use tokio::sync::oneshot;

static HANDLE: OnceCell<tokio::runtime::Handle> = OnceCell::new();

/// Starts the background runtime, the returned closure shuts it down and waits for it
pub fn start() -> anyhow::Result<impl FnOnce()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let handle = rt.handle().clone();
    HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("the runtime was already started"))?;

    let (tx, rx) = oneshot::channel::<()>();
    let thread = std::thread::spawn(move || {
        rt.block_on(async move {
            let _ = rx.await;
        });
        rt.shutdown_timeout(std::time::Duration::from_secs(1));
    });

    Ok(move || {
        drop(tx);
        let _ = thread.join();
    })
}

/// Runs `fut` in the background, the task is detached
pub fn spawn(fut: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let handle = HANDLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("the runtime has not been started"))?;
    handle.spawn(fut);
    Ok(())
}
