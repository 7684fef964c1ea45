//! Branch Commands

use tauri::State;

use crate::domain::Branch;
use crate::service::Loaded;
use crate::AppState;

#[tauri::command]
pub async fn list_branches(state: State<'_, AppState>) -> Result<Loaded<Vec<Branch>>, String> {
    let mut console = state.console.lock().await;
    Ok(console.load_branches().await)
}

#[tauri::command]
pub async fn search_branches(
    query: String,
    state: State<'_, AppState>,
) -> Result<Vec<Branch>, String> {
    let console = state.console.lock().await;
    Ok(console.search_branches(&query))
}

#[tauri::command]
pub async fn get_branch(id: String, state: State<'_, AppState>) -> Result<Branch, String> {
    let console = state.console.lock().await;
    console.get_branch(&id).await.map_err(|e| e.to_string())
}

/// Create when `id` is absent, otherwise update
#[tauri::command]
pub async fn submit_branch(
    id: Option<String>,
    name: String,
    info: String,
    state: State<'_, AppState>,
) -> Result<Branch, String> {
    let mut console = state.console.lock().await;
    console
        .submit_branch(id.as_deref(), &name, &info)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_branch(id: String, state: State<'_, AppState>) -> Result<(), String> {
    let mut console = state.console.lock().await;
    console.delete_branch(&id).await.map_err(|e| e.to_string())
}
