use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Monotonic reload generation. `0` is the configuration loaded at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadEvent {
    pub generation: u64,
}

#[derive(Clone)]
pub struct ReloadHandle {
    tx: watch::Sender<ReloadEvent>,
    generation: std::sync::Arc<AtomicU64>,
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ReloadEvent { generation: 0 });
        Self {
            tx,
            generation: Default::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub fn notify_reload(&self) -> ReloadEvent {
        let event = ReloadEvent {
            generation: self.generation.fetch_add(1, Ordering::Relaxed) + 1,
        };
        self.tx.send_replace(event);
        tracing::info!(generation = event.generation, "reload signaled");
        event
    }

    /// Turn every SIGHUP into a reload notification. Runs until the signal
    /// stream closes.
    pub async fn install_signal_handler(&self) -> anyhow::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut hup = signal(SignalKind::hangup())?;
        while hup.recv().await.is_some() {
            tracing::info!("SIGHUP received");
            self.notify_reload();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn subscribers_see_latest_generation() {
        let handle = ReloadHandle::new();
        let mut rx = handle.subscribe();

        handle.notify_reload();
        handle.notify_reload();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().generation, 2);
    }
}
