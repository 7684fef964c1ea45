//! Log Commands

/// Most recent log lines, oldest first
#[tauri::command]
pub fn recent_logs() -> Vec<String> {
    rolling_logger::recent_lines()
}
