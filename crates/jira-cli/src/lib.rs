//! Library side of the `jira-port` CLI: settings, logging, and phase orchestration.

pub mod logging;
pub mod pipeline;
pub mod settings;
