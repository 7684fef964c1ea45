//! Commands Layer
//!
//! Tauri command handlers that bridge the webview to the console service.
//! Errors cross the IPC boundary as display strings.

mod auth_cmd;
mod dashboard_cmd;
mod branch_cmd;
mod follow_up_cmd;
mod task_cmd;
mod log_cmd;

pub use auth_cmd::*;
pub use dashboard_cmd::*;
pub use branch_cmd::*;
pub use follow_up_cmd::*;
pub use task_cmd::*;
pub use log_cmd::*;
