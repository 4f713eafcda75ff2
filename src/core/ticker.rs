//! Periodic re-evaluation loop.
//!
//! Aging alone can change which request is most urgent, so the scheduler
//! re-runs a matching pass on a fixed period even when nothing external
//! happens. The loop runs either as an async task on a [`Spawn`]er or on a
//! dedicated OS thread, and stops when its [`TickerHandle`] is shut down or
//! dropped.

use std::future::Future;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Abstraction for spawning async work on a runtime.
pub trait Spawn {
    /// Spawn a future to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Shared stop signal for both ticker flavours.
struct TickerControl {
    stopped: Mutex<bool>,
    wake: Condvar,
    #[cfg(feature = "tokio-runtime")]
    notify: tokio::sync::Notify,
}

impl TickerControl {
    fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
            #[cfg(feature = "tokio-runtime")]
            notify: tokio::sync::Notify::new(),
        }
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

/// Handle to a running ticker. Dropping it stops the ticker.
pub struct TickerHandle {
    control: Arc<TickerControl>,
    thread: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stop the ticker. For the thread flavour this also joins the thread.
    /// Calling it more than once is harmless.
    pub fn shutdown(&mut self) {
        {
            let mut stopped = self.control.stopped.lock();
            if !*stopped {
                *stopped = true;
                tracing::debug!("ticker shutdown requested");
            }
        }
        self.control.wake.notify_all();
        #[cfg(feature = "tokio-runtime")]
        self.control.notify.notify_one();

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("ticker thread panicked");
            }
        }
    }

    /// True once shutdown has been requested.
    pub fn is_stopped(&self) -> bool {
        self.control.is_stopped()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clamp_period(period: Duration) -> Duration {
    period.max(Duration::from_millis(1))
}

/// Run `on_tick` every `period` on a dedicated OS thread.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_thread_ticker<F>(period: Duration, on_tick: F) -> std::io::Result<TickerHandle>
where
    F: Fn() + Send + 'static,
{
    let period = clamp_period(period);
    let control = Arc::new(TickerControl::new());
    let worker_control = Arc::clone(&control);

    let thread = thread::Builder::new()
        .name("scheduler-ticker".into())
        .spawn(move || {
            tracing::debug!(period_ms = period.as_millis(), "thread ticker started");
            loop {
                let deadline = Instant::now() + period;
                let mut stopped = worker_control.stopped.lock();
                while !*stopped {
                    if worker_control.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                if *stopped {
                    break;
                }
                drop(stopped);
                on_tick();
            }
            tracing::debug!("thread ticker stopped");
        })?;

    Ok(TickerHandle {
        control,
        thread: Some(thread),
    })
}

/// Run `on_tick` every `period` as an async task on `spawner`.
#[cfg(feature = "tokio-runtime")]
pub fn spawn_async_ticker<S, F>(spawner: &S, period: Duration, on_tick: F) -> TickerHandle
where
    S: Spawn,
    F: Fn() + Send + 'static,
{
    let period = clamp_period(period);
    let control = Arc::new(TickerControl::new());
    let task_control = Arc::clone(&control);

    spawner.spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        tracing::debug!(period_ms = period.as_millis(), "async ticker started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if task_control.is_stopped() {
                        break;
                    }
                    on_tick();
                }
                () = task_control.notify.notified() => break,
            }
        }
        tracing::debug!("async ticker stopped");
    });

    TickerHandle {
        control,
        thread: None,
    }
}
