//! Polling runtime for the continuous-testing GitHub App bot.

mod continuous_testing_runtime;

pub use continuous_testing_runtime::{run_continuous_testing_bot, ContinuousTestingRuntimeConfig};
