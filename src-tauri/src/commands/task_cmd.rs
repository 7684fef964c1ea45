//! Task and Required Item Commands

use tauri::State;

use crate::domain::{Required, StatusFilter, Task};
use crate::service::{Loaded, TaskSummary};
use crate::AppState;

#[tauri::command]
pub async fn list_tasks(state: State<'_, AppState>) -> Result<Loaded<Vec<TaskSummary>>, String> {
    let mut console = state.console.lock().await;
    Ok(console.load_tasks().await)
}

/// `status` is `all`, `completed` or `pending`
#[tauri::command]
pub async fn filter_tasks(
    status: String,
    state: State<'_, AppState>,
) -> Result<Vec<TaskSummary>, String> {
    let console = state.console.lock().await;
    Ok(console.filter_tasks(StatusFilter::from_str(&status)))
}

#[tauri::command]
pub async fn get_task(id: String, state: State<'_, AppState>) -> Result<Task, String> {
    let console = state.console.lock().await;
    console.get_task(&id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_task(
    id: Option<String>,
    title: String,
    note: String,
    state: State<'_, AppState>,
) -> Result<Task, String> {
    let mut console = state.console.lock().await;
    console
        .submit_task(id.as_deref(), &title, &note)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_task(id: String, state: State<'_, AppState>) -> Result<(), String> {
    let mut console = state.console.lock().await;
    console.delete_task(&id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_required(id: String, state: State<'_, AppState>) -> Result<Required, String> {
    let mut console = state.console.lock().await;
    console.get_required(&id).await.map_err(|e| e.to_string())
}

/// Create (linked to `task_id` when given) when `id` is absent, otherwise update
#[tauri::command]
pub async fn submit_required(
    id: Option<String>,
    task_id: Option<String>,
    description: String,
    note: String,
    completion: bool,
    state: State<'_, AppState>,
) -> Result<Required, String> {
    let mut console = state.console.lock().await;
    console
        .submit_required(
            id.as_deref(),
            task_id.as_deref(),
            &description,
            &note,
            completion,
        )
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_requirement(
    id: String,
    completed: bool,
    state: State<'_, AppState>,
) -> Result<Required, String> {
    let mut console = state.console.lock().await;
    console
        .toggle_requirement(&id, completed)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_required(id: String, state: State<'_, AppState>) -> Result<(), String> {
    let mut console = state.console.lock().await;
    console.delete_required(&id).await.map_err(|e| e.to_string())
}
