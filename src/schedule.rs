use std::thread;
use std::time::Duration;

use color_eyre::Result;
use tokio::runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// Events delivered from timer tasks to the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A reminder's trigger time arrived.
    Fired(u64),
    /// A 1-second display-refresh tick.
    Tick,
}

/// Handle to a scheduled timer task. Cancelling (or dropping) the handle
/// aborts the task, so a removed reminder can never fire afterwards.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Timer scheduler backed by a current-thread tokio runtime parked on a
/// dedicated thread. The UI loop stays synchronous; timer tasks only ever
/// touch the channel.
pub struct Scheduler {
    handle: runtime::Handle,
    tx: UnboundedSender<TimerEvent>,
}

impl Scheduler {
    pub fn new() -> Result<(Self, UnboundedReceiver<TimerEvent>)> {
        let rt = runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let handle = rt.handle().clone();

        thread::Builder::new()
            .name("reminder-timers".to_string())
            .spawn(move || {
                rt.block_on(std::future::pending::<()>());
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        Ok((Self { handle, tx }, rx))
    }

    /// Arm a one-shot timer that reports `Fired(id)` after `delay`.
    /// A zero delay fires on the next scheduler pass.
    pub fn once(&self, delay: Duration, id: u64) -> TimerHandle {
        let tx = self.tx.clone();
        let task = self.handle.spawn(async move {
            sleep(delay).await;
            let _ = tx.send(TimerEvent::Fired(id));
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }

    /// Arm a repeating 1-second tick that drives display refresh.
    pub fn tick(&self) -> TimerHandle {
        let tx = self.tx.clone();
        let task = self.handle.spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(TimerEvent::Tick).is_err() {
                    break;
                }
            }
        });
        TimerHandle {
            abort: task.abort_handle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn wait_for_fired(rx: &mut UnboundedReceiver<TimerEvent>, id: u64) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            match rx.try_recv() {
                Ok(TimerEvent::Fired(got)) if got == id => return true,
                Ok(_) => {}
                Err(_) => thread::sleep(Duration::from_millis(5)),
            }
        }
        false
    }

    #[test]
    fn zero_delay_fires_promptly() {
        let (scheduler, mut rx) = Scheduler::new().unwrap();
        let _handle = scheduler.once(Duration::ZERO, 7);
        assert!(wait_for_fired(&mut rx, 7));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let (scheduler, mut rx) = Scheduler::new().unwrap();
        let handle = scheduler.once(Duration::from_millis(50), 3);
        handle.cancel();
        thread::sleep(Duration::from_millis(150));
        assert!(!wait_for_fired_now(&mut rx, 3));
    }

    fn wait_for_fired_now(rx: &mut UnboundedReceiver<TimerEvent>, id: u64) -> bool {
        while let Ok(ev) = rx.try_recv() {
            if ev == TimerEvent::Fired(id) {
                return true;
            }
        }
        false
    }

    #[test]
    fn dropping_the_handle_aborts() {
        let (scheduler, mut rx) = Scheduler::new().unwrap();
        drop(scheduler.once(Duration::from_millis(50), 9));
        thread::sleep(Duration::from_millis(150));
        assert!(!wait_for_fired_now(&mut rx, 9));
    }
}
