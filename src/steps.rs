//! The stages of a run, in the order [`crate::App::run`] drives them.
//!
//! - [`clone`]: fetch the repository into the working directory
//! - [`rewrite`]: apply the updater to every text file
//! - [`commit`]: commit the rewrite on a fresh branch and push it
//! - [`pull_request`]: open a pull request for the pushed branch

pub mod clone;
pub mod commit;
pub mod pull_request;
pub mod rewrite;
