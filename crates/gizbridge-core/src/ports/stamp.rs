//! Response stamping ports.
//!
//! Each composed completion carries a fresh id and a creation timestamp.
//! Both come in through ports so production gets real values per call while
//! tests pin them to constants.

use std::fmt;

use uuid::Uuid;

/// Source of `created` timestamps.
pub trait ClockPort: Send + Sync + fmt::Debug {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> i64;
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Source of completion identifiers.
pub trait CompletionIdPort: Send + Sync + fmt::Debug {
    /// Fresh identifier for one composed completion.
    fn next_id(&self) -> String;
}

/// Random `chatcmpl-<uuid4>` identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCompletionIds;

impl CompletionIdPort for UuidCompletionIds {
    fn next_id(&self) -> String {
        format!("chatcmpl-{}", Uuid::new_v4())
    }
}
