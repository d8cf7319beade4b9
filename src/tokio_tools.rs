use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Spawns a Tokio task named `name`. Without `tokio_unstable` the name rides on a tracing span.
pub fn spawn_named_task<F, S>(name: S, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    S: Into<String>,
{
    let name_owned = name.into();
    #[cfg(tokio_unstable)]
    {
        tokio::task::Builder::new().name(&name_owned).spawn(future)
    }
    #[cfg(not(tokio_unstable))]
    {
        use tracing::Instrument;
        let span = tracing::info_span!("task", task_name = %name_owned);
        tokio::spawn(future.instrument(span))
    }
}

/// Runs `future` once `delay` has elapsed. Best effort: lost if the runtime shuts down first.
pub fn spawn_after<F, S>(name: S, delay: Duration, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    S: Into<String>,
{
    spawn_named_task(name, async move {
        tokio::time::sleep(delay).await;
        future.await
    })
}
