//! Follow-up Commands

use tauri::{AppHandle, Runtime, State};
use tauri_plugin_dialog::DialogExt;

use crate::domain::{FollowUp, FollowUpFields};
use crate::service::{
    ChecklistEntry, FollowUpDetail, FollowUpFilter, FollowUpForm, FollowUpListing, Loaded,
    MediaView,
};
use crate::AppState;

const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "mp4", "mov", "pdf"];

#[tauri::command]
pub async fn list_follow_ups(
    state: State<'_, AppState>,
) -> Result<Loaded<FollowUpListing>, String> {
    let mut console = state.console.lock().await;
    Ok(console.load_follow_ups().await)
}

#[tauri::command]
pub async fn filter_follow_ups(
    filter: FollowUpFilter,
    state: State<'_, AppState>,
) -> Result<Vec<FollowUp>, String> {
    let console = state.console.lock().await;
    Ok(console.filter_follow_ups(&filter))
}

#[tauri::command]
pub async fn view_follow_up(
    id: String,
    state: State<'_, AppState>,
) -> Result<FollowUpDetail, String> {
    let mut console = state.console.lock().await;
    console.view_follow_up(&id).await.map_err(|e| e.to_string())
}

/// Form for a new report (`id` absent) or an existing one
#[tauri::command]
pub async fn open_follow_up_form(
    id: Option<String>,
    state: State<'_, AppState>,
) -> Result<FollowUpForm, String> {
    let mut console = state.console.lock().await;
    console
        .open_follow_up_form(id.as_deref())
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn submit_follow_up(
    id: Option<String>,
    fields: FollowUpFields,
    entries: Vec<ChecklistEntry>,
    state: State<'_, AppState>,
) -> Result<FollowUp, String> {
    let mut console = state.console.lock().await;
    console
        .submit_follow_up(id.as_deref(), &fields, &entries)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_follow_up(id: String, state: State<'_, AppState>) -> Result<(), String> {
    let mut console = state.console.lock().await;
    console.delete_follow_up(&id).await.map_err(|e| e.to_string())
}

/// Let the user pick files and upload them; cancelling uploads nothing.
#[tauri::command]
pub async fn pick_and_upload_media<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState>,
) -> Result<Vec<MediaView>, String> {
    let picked = app
        .dialog()
        .file()
        .add_filter("Media", MEDIA_EXTENSIONS)
        .blocking_pick_files();
    let Some(files) = picked else {
        return Ok(Vec::new());
    };

    let paths = files
        .into_iter()
        .map(|file| file.into_path().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, String>>()?;
    log::info!("[app] uploading {} picked files", paths.len());

    let console = state.console.lock().await;
    console
        .upload_media_files(&paths)
        .await
        .map_err(|e| e.to_string())
}
