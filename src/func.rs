use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("callback panicked: {message}")]
pub struct CaughtPanic {
    message: String,
}

impl CaughtPanic {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Call `f`, converting a panic into an error instead of unwinding into the
/// caller. Used around user-supplied callbacks (log handlers, triggers) so
/// one bad callback cannot tear down the dispatch loop.
pub fn run<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };
        CaughtPanic { message }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn passes_result_through() {
        assert_eq!(run(|| 2 + 2).unwrap(), 4);
    }

    #[test]
    fn captures_panic_message() {
        let err = run(|| -> u32 { panic!("boom") }).unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn captures_formatted_panic_message() {
        let err = run(|| -> u32 { panic!("bad value: {}", 7) }).unwrap_err();
        assert_eq!(err.message(), "bad value: 7");
    }
}
