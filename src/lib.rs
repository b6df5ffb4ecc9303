//! Tooling for an awesome-style list of starred GitHub repositories:
//! rendering it from a star snapshot, reading it back, linting its
//! structure and auditing the listed repositories for staleness.

pub mod analyzer;
pub mod cli;
pub mod document;
pub mod error;
pub mod github;
pub mod lint;
pub mod models;
pub mod readme;
pub mod slug;
pub mod staleness;
pub mod summary;
pub mod types;
