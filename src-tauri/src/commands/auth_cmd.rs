//! Auth Commands

use tauri::State;

use crate::domain::SessionInfo;
use crate::AppState;

#[tauri::command]
pub async fn login(
    identifier: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<SessionInfo, String> {
    let mut console = state.console.lock().await;
    console.login(&identifier, &password).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn logout(state: State<'_, AppState>) -> Result<(), String> {
    let mut console = state.console.lock().await;
    console.logout().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn current_session(state: State<'_, AppState>) -> Result<Option<SessionInfo>, String> {
    let console = state.console.lock().await;
    Ok(console.current_session())
}
