//! Test-report model and comment rendering for the continuous-testing bot.
//! The artifact store publishes one JSON report per commit; this crate owns
//! the serde contract for that document and the pure markdown rendering the
//! runtime posts to pull requests.

pub mod render;
pub mod report;
