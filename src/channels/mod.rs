//! Channels that carry a conversation to and from the student.

pub mod cli;

pub use cli::CliChannel;
