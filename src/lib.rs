pub mod clients;
pub mod config;
pub mod content;
pub mod context;
pub mod steps;
pub mod updater;

mod app;

pub use app::App;
pub use app::Outcome;
pub use config::Config;
pub use context::JobContext;
pub use updater::JobType;
pub use updater::Updater;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
