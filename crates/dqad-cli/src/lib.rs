//! Library side of the `dqad` command-line tool.

pub mod config;
pub mod logging;
pub mod output;
pub mod pipeline;
