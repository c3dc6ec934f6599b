#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]

pub mod compose;
pub mod models;
pub mod server;
pub mod upstream;

pub use server::{AppState, serve};
pub use upstream::GizClient;

// Silence unused dev-dependency warnings; unit tests run on #[tokio::test]
#[cfg(test)]
use tokio_test as _;
