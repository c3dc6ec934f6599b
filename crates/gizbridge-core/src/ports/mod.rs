//! Port definitions: the trait seams adapter crates implement.
//!
//! Core owns the traits; the proxy crate supplies the real implementations
//! and tests supply doubles. Keeping the seams here means envelope
//! composition and the HTTP layer never name a concrete HTTP client or
//! clock.

pub mod inference;
pub mod stamp;

pub use inference::{InferencePort, UpstreamError};
pub use stamp::{ClockPort, CompletionIdPort, SystemClock, UuidCompletionIds};
