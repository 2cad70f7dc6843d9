use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// One countdown second, tagged with the task that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Repeating tick task. Aborted when dropped.
#[derive(Debug)]
pub struct CountdownTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Spawn a task sending `Tick { generation }` every `period`, first tick
    /// one period from now. Stops on its own once the receiver is gone.
    #[must_use]
    pub fn spawn(generation: u64, period: Duration, ticks: UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { generation, handle }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
