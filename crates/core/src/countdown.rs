/// Remaining time at which the one-time low-time warning fires.
pub const WARNING_THRESHOLD_SECS: u32 = 300;

/// What a single one-second tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed.
    Idle,
    Running,
    /// Remaining time just reached the warning threshold (once per countdown).
    Warning,
    /// Remaining time reached zero; the countdown stopped itself.
    Expired,
}

/// Seconds-remaining clock for an attempt.
///
/// Only decreases, stops at zero, and reports the warning threshold once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    planned_secs: u32,
    remaining_secs: u32,
    warned: bool,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn from_secs(planned_secs: u32) -> Self {
        Self {
            planned_secs,
            remaining_secs: planned_secs,
            warned: false,
            running: false,
        }
    }

    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_secs(minutes.saturating_mul(60))
    }

    /// Starts (or resumes) ticking. Returns false when no time is left.
    pub fn start(&mut self) -> bool {
        self.running = self.remaining_secs > 0;
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn planned_secs(&self) -> u32 {
        self.planned_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn has_time_left(&self) -> bool {
        self.remaining_secs > 0
    }

    /// Planned duration minus remaining time.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.planned_secs - self.remaining_secs
    }

    /// True once remaining time is at or below the warning threshold.
    #[must_use]
    pub fn in_warning_zone(&self) -> bool {
        self.remaining_secs <= WARNING_THRESHOLD_SECS
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return TickOutcome::Expired;
        }
        if self.remaining_secs == WARNING_THRESHOLD_SECS && !self.warned {
            self.warned = true;
            return TickOutcome::Warning;
        }
        TickOutcome::Running
    }

    /// `MM:SS`, minutes not capped at 59.
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(countdown: &mut Countdown) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let outcome = countdown.tick();
            if outcome == TickOutcome::Idle {
                break;
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    #[test]
    fn short_countdown_never_warns_and_expires_once() {
        let mut countdown = Countdown::from_minutes(1);
        assert!(countdown.start());
        let outcomes = run_to_end(&mut countdown);

        assert_eq!(outcomes.len(), 60);
        assert!(!outcomes.contains(&TickOutcome::Warning));
        assert_eq!(
            outcomes.iter().filter(|o| **o == TickOutcome::Expired).count(),
            1
        );
        assert_eq!(countdown.remaining_secs(), 0);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn warning_fires_exactly_once_at_threshold() {
        let mut countdown = Countdown::from_secs(301);
        countdown.start();

        assert_eq!(countdown.tick(), TickOutcome::Warning);
        assert_eq!(countdown.remaining_secs(), 300);
        for _ in 0..10 {
            assert_eq!(countdown.tick(), TickOutcome::Running);
        }
    }

    #[test]
    fn stopped_countdown_does_not_move() {
        let mut countdown = Countdown::from_secs(10);
        countdown.start();
        countdown.tick();
        countdown.stop();
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining_secs(), 9);
        assert_eq!(countdown.elapsed_secs(), 1);

        assert!(countdown.start());
        countdown.tick();
        assert_eq!(countdown.remaining_secs(), 8);
    }

    #[test]
    fn restart_after_warning_does_not_warn_again() {
        let mut countdown = Countdown::from_secs(302);
        countdown.start();
        countdown.tick();
        assert_eq!(countdown.tick(), TickOutcome::Warning);
        countdown.stop();
        countdown.start();
        assert_eq!(countdown.tick(), TickOutcome::Running);
    }

    #[test]
    fn display_pads_minutes_and_seconds() {
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(3600), "60:00");
        let countdown = Countdown::from_secs(300);
        assert!(countdown.in_warning_zone());
        assert!(!Countdown::from_secs(301).in_warning_zone());
    }
}
