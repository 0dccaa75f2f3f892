//! Press-and-hold style repeating trigger: fires immediately, waits an
//! initial delay, then repeats at a fixed interval. Driven by polling from
//! the host loop instead of a background timer, so it needs no threads and
//! stays testable with a mocked clock.

pub use std::time::Duration;

#[cfg(not(test))]
use instant::Instant;
#[cfg(test)]
use mock_instant::Instant;

use crate::func;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

struct TriggerState {
    next_due: Instant,
    repeating: bool,
}

pub struct RepeatingTrigger<F: FnMut()> {
    callback: F,
    initial_delay: Duration,
    repeat_interval: Duration,
    state: Option<TriggerState>,
}

impl<F: FnMut()> RepeatingTrigger<F> {
    pub fn new(callback: F) -> Self {
        Self::with_delays(callback, DEFAULT_INITIAL_DELAY, DEFAULT_REPEAT_INTERVAL)
    }

    pub fn with_delays(callback: F, initial_delay: Duration, repeat_interval: Duration) -> Self {
        let mut trigger = RepeatingTrigger {
            callback,
            initial_delay: DEFAULT_INITIAL_DELAY,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            state: None,
        };
        trigger.set_initial_delay(initial_delay);
        trigger.set_repeat_interval(repeat_interval);
        trigger
    }

    /// Fire once and arm the initial delay. No-op while already running.
    pub fn start(&mut self) {
        if self.state.is_some() {
            return;
        }
        self.fire();
        self.state = Some(TriggerState {
            next_due: Instant::now() + self.initial_delay,
            repeating: false,
        });
    }

    /// Advance the schedule, firing once per elapsed period. Returns how
    /// many times the callback fired, so a long gap between polls catches
    /// up like a queued interval would.
    pub fn poll(&mut self) -> u32 {
        let now = Instant::now();
        let mut fired = 0;
        loop {
            match &self.state {
                Some(state) if state.next_due <= now => {}
                _ => break,
            }
            self.fire();
            fired += 1;
            if let Some(state) = &mut self.state {
                state.next_due = state.next_due + self.repeat_interval;
                state.repeating = true;
            }
        }
        fired
    }

    pub fn stop(&mut self) {
        self.state = None;
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// True once the initial delay has elapsed and the trigger is in the
    /// fixed-interval phase.
    pub fn is_repeating(&self) -> bool {
        self.state.as_ref().map(|state| state.repeating).unwrap_or(false)
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Zero durations are ignored.
    pub fn set_initial_delay(&mut self, value: Duration) {
        if value > Duration::from_millis(0) {
            self.initial_delay = value;
        }
    }

    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Zero durations are ignored.
    pub fn set_repeat_interval(&mut self, value: Duration) {
        if value > Duration::from_millis(0) {
            self.repeat_interval = value;
        }
    }

    fn fire(&mut self) {
        let callback = &mut self.callback;
        if let Err(err) = func::run(|| callback()) {
            log::warn!("trigger callback panicked: {}", err.message());
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use lazy_static::lazy_static;
    use mock_instant::MockClock;

    use super::*;

    lazy_static! {
        // MockClock is process global; serialize the tests that advance it
        static ref CLOCK: Mutex<()> = Mutex::new(());
    }

    fn counting_trigger(
        initial_delay: u64,
        repeat_interval: u64,
    ) -> (RepeatingTrigger<impl FnMut()>, Arc<Mutex<u32>>) {
        let count = Arc::new(Mutex::new(0));
        let count2 = count.clone();
        let trigger = RepeatingTrigger::with_delays(
            move || *count2.lock().unwrap() += 1,
            Duration::from_millis(initial_delay),
            Duration::from_millis(repeat_interval),
        );
        (trigger, count)
    }

    #[test]
    fn fires_immediately_then_waits() {
        let _guard = CLOCK.lock().unwrap();
        let (mut trigger, count) = counting_trigger(500, 100);

        trigger.start();
        assert_eq!(*count.lock().unwrap(), 1);
        assert!(trigger.is_running());
        assert!(!trigger.is_repeating());

        MockClock::advance(Duration::from_millis(499));
        assert_eq!(trigger.poll(), 0);
        assert_eq!(*count.lock().unwrap(), 1);

        MockClock::advance(Duration::from_millis(1));
        assert_eq!(trigger.poll(), 1);
        assert!(trigger.is_repeating());
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn repeats_at_interval() {
        let _guard = CLOCK.lock().unwrap();
        let (mut trigger, count) = counting_trigger(500, 100);

        trigger.start();
        MockClock::advance(Duration::from_millis(500));
        trigger.poll();

        MockClock::advance(Duration::from_millis(100));
        assert_eq!(trigger.poll(), 1);
        MockClock::advance(Duration::from_millis(350));
        // catches up: three full intervals elapsed
        assert_eq!(trigger.poll(), 3);
        assert_eq!(*count.lock().unwrap(), 6);
    }

    #[test]
    fn start_while_running_is_noop() {
        let _guard = CLOCK.lock().unwrap();
        let (mut trigger, count) = counting_trigger(500, 100);

        trigger.start();
        trigger.start();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn stop_disarms() {
        let _guard = CLOCK.lock().unwrap();
        let (mut trigger, count) = counting_trigger(500, 100);

        trigger.start();
        trigger.stop();
        assert!(!trigger.is_running());

        MockClock::advance(Duration::from_millis(2000));
        assert_eq!(trigger.poll(), 0);
        assert_eq!(*count.lock().unwrap(), 1);

        // restart goes through the whole cycle again
        trigger.start();
        assert_eq!(*count.lock().unwrap(), 2);
        assert!(!trigger.is_repeating());
    }

    #[test]
    fn zero_durations_are_ignored() {
        let (mut trigger, _) = counting_trigger(500, 100);
        trigger.set_initial_delay(Duration::from_millis(0));
        trigger.set_repeat_interval(Duration::from_millis(0));
        assert_eq!(trigger.initial_delay(), Duration::from_millis(500));
        assert_eq!(trigger.repeat_interval(), Duration::from_millis(100));

        trigger.set_initial_delay(Duration::from_millis(250));
        assert_eq!(trigger.initial_delay(), Duration::from_millis(250));
    }

    #[test]
    fn panicking_callback_is_contained() {
        let _guard = CLOCK.lock().unwrap();
        let mut trigger = RepeatingTrigger::new(|| panic!("bad callback"));
        trigger.start();
        assert!(trigger.is_running());
    }
}
