pub mod common;
pub mod config;
pub mod market;
pub mod news;
pub mod score;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
