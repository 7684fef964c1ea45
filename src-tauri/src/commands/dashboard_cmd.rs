//! Dashboard Commands

use tauri::State;

use crate::service::DashboardSummary;
use crate::AppState;

#[tauri::command]
pub async fn load_dashboard(state: State<'_, AppState>) -> Result<DashboardSummary, String> {
    let mut console = state.console.lock().await;
    Ok(console.load_dashboard().await)
}
