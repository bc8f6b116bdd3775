use log::{debug, error, info};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::Notify,
    task::{JoinHandle, JoinSet},
    time::MissedTickBehavior,
};

use crate::models::stream::Stream;

/// Independent fixed-interval refresh streams.
///
/// Each stream fires immediately, then every `period`. Every tick runs in its own
/// task, so a slow refresh never holds back the next tick of its stream or any
/// other stream.
pub struct Scheduler {
    shutdown: Arc<Notify>,
    handles: Vec<(Stream, JoinHandle<()>)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            shutdown: Arc::new(Notify::new()),
            handles: Vec::new(),
        }
    }

    pub fn streams(&self) -> Vec<Stream> {
        self.handles.iter().map(|(stream, _)| *stream).collect()
    }

    pub fn every<F, Fut>(&mut self, stream: Stream, period: Duration, task: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shutdown = Arc::clone(&self.shutdown);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut running = JoinSet::new();
            let stop = shutdown.notified();
            tokio::pin!(stop);

            info!("{}: refreshing every {:?}", stream, period);

            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        debug!("{}: tick", stream);
                        running.spawn(task());
                    }
                    Some(done) = running.join_next(), if !running.is_empty() => {
                        if let Err(e) = done {
                            error!("{}: refresh task failed: {}", stream, e);
                        }
                    }
                }
            }

            running.abort_all();
            info!("{}: stopped", stream);
        });

        self.handles.push((stream, handle));
    }

    /// Signals every stream, then cancels whatever is still running.
    pub async fn shutdown(self) {
        self.shutdown.notify_waiters();

        for (stream, handle) in self.handles {
            handle.abort();

            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("{}: stream ended abnormally: {}", stream, e);
                }
            }
        }
    }
}
