//! Two-rate logical clock
//!
//! Replaces free-running timers: the caller feeds elapsed time and gets back
//! the ticks that fell due, in time order. Tests step it without real time
//! passing.

use std::time::Duration;

use crate::settings::SimConfig;

/// A tick that fell due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// World advancement
    Coarse,
    /// Small tick plus dirty flush
    Fine,
}

#[derive(Debug, Clone)]
pub struct Clock {
    fine_period: Duration,
    coarse_period: Duration,
    max_catch_up: u32,
    now: Duration,
    next_fine: Duration,
    next_coarse: Duration,
}

impl Clock {
    pub fn new(fine_period: Duration, coarse_period: Duration, max_catch_up: u32) -> Self {
        Self {
            fine_period,
            coarse_period,
            max_catch_up: max_catch_up.max(1),
            now: Duration::ZERO,
            next_fine: fine_period,
            next_coarse: coarse_period,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.fine_period(),
            config.coarse_period(),
            config.max_catch_up,
        )
    }

    /// Logical time since start
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move time forward and return every tick that fell due
    ///
    /// A coarse and a fine tick due at the same instant come out coarse
    /// first, so the flush shows the advanced world. At most `max_catch_up`
    /// ticks are returned; the rest of the backlog is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ClockTick> {
        let target = self.now + elapsed;
        let mut ticks = Vec::new();

        loop {
            let next = self.next_fine.min(self.next_coarse);
            if next > target {
                break;
            }
            if ticks.len() as u32 >= self.max_catch_up {
                log::warn!(
                    "clock fell behind at {:?}; dropping backlog after {} ticks",
                    target,
                    ticks.len()
                );
                self.next_fine = skip_past(self.next_fine, self.fine_period, target);
                self.next_coarse = skip_past(self.next_coarse, self.coarse_period, target);
                break;
            }
            if self.next_coarse <= self.next_fine {
                ticks.push(ClockTick::Coarse);
                self.next_coarse += self.coarse_period;
            } else {
                ticks.push(ClockTick::Fine);
                self.next_fine += self.fine_period;
            }
        }

        self.now = target;
        ticks
    }
}

/// First deadline on `period`'s cadence strictly after `target`
fn skip_past(deadline: Duration, period: Duration, target: Duration) -> Duration {
    if deadline > target {
        return deadline;
    }
    let period_ns = period.as_nanos().max(1);
    let periods = (target - deadline).as_nanos() / period_ns + 1;
    deadline + Duration::from_nanos((periods * period_ns) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_due_yet() {
        let mut clock = Clock::new(ms(40), ms(500), 64);
        assert!(clock.advance(ms(39)).is_empty());
        assert_eq!(clock.advance(ms(1)), vec![ClockTick::Fine]);
        assert_eq!(clock.now(), ms(40));
    }

    #[test]
    fn test_default_rates() {
        let mut clock = Clock::from_config(&SimConfig {
            max_catch_up: 64,
            ..Default::default()
        });
        let ticks = clock.advance(ms(500));
        assert_eq!(ticks.iter().filter(|t| **t == ClockTick::Fine).count(), 12);
        assert_eq!(ticks.last(), Some(&ClockTick::Coarse));
    }

    #[test]
    fn test_coarse_before_fine_at_same_instant() {
        let mut clock = Clock::new(ms(100), ms(200), 64);
        assert_eq!(
            clock.advance(ms(200)),
            vec![ClockTick::Fine, ClockTick::Coarse, ClockTick::Fine]
        );
    }

    #[test]
    fn test_small_steps_match_one_big_step() {
        let mut a = Clock::new(ms(40), ms(500), 1000);
        let mut b = Clock::new(ms(40), ms(500), 1000);
        let mut stepped = Vec::new();
        for _ in 0..100 {
            stepped.extend(a.advance(ms(20)));
        }
        assert_eq!(stepped, b.advance(ms(2000)));
    }

    #[test]
    fn test_backlog_is_dropped() {
        let mut clock = Clock::new(ms(10), ms(1000), 8);
        let ticks = clock.advance(ms(1000));
        assert_eq!(ticks.len(), 8);
        // deadlines realigned past the backlog
        assert_eq!(clock.advance(ms(9)), Vec::new());
        assert_eq!(clock.advance(ms(1)), vec![ClockTick::Fine]);
    }

    #[test]
    fn test_skip_past() {
        assert_eq!(skip_past(ms(10), ms(10), ms(35)), ms(40));
        assert_eq!(skip_past(ms(40), ms(10), ms(40)), ms(50));
        assert_eq!(skip_past(ms(50), ms(10), ms(40)), ms(50));
    }
}
