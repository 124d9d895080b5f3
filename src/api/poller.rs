use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Periodic refresh owned by a single view. Stops when [`Poller::stop`] is
/// awaited or the handle is dropped.
pub struct Poller {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Run `tick` every `interval`, first tick immediately. A failing tick is
    /// logged and the loop keeps going.
    pub fn start<F, Fut, E>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        debug!("Polling {}", name);
                        if let Err(err) = tick().await {
                            warn!("Refresh of {} failed: {}", name, err);
                        }
                    }
                }
            }

            debug!("Poller {} stopped", name);
        });

        info!("Started polling {} every {:?}", name, interval);
        Self {
            name,
            stop_tx,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for it to finish
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!("Poller {} ended abnormally: {}", self.name, err);
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}
