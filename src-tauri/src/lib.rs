//! Branch Follow-up Console Backend
//!
//! Layered architecture:
//! - domain: Records, identifier rules, completion and the follow-up reconciler
//! - repository: Strapi REST client and the local session store
//! - service: The console workflows and their view state
//! - commands: Tauri command handlers (`desktop` feature)

pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use desktop::{run, AppState};

#[cfg(feature = "desktop")]
mod desktop {
    use std::path::PathBuf;
    use std::sync::Arc;
    use tauri::Manager;
    use tokio::sync::Mutex;

    use crate::commands;
    use crate::config::ConsoleConfig;
    use crate::repository::{init_db, SessionRepository};
    use crate::service::Console;

    /// Application state shared across commands
    pub struct AppState {
        pub console: Mutex<Console>,
    }

    /// Get database path from app handle
    fn get_db_path(app_handle: &tauri::AppHandle) -> Result<PathBuf, String> {
        let app_dir = app_handle.path().app_data_dir().map_err(|e| e.to_string())?;
        std::fs::create_dir_all(&app_dir).map_err(|e| e.to_string())?;
        Ok(app_dir.join("branch_console.db"))
    }

    fn setup(app: &mut tauri::App) -> Result<(), Box<dyn std::error::Error>> {
        // Single instance check - must be first!
        app.handle().plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // Focus the existing window when a new instance tries to start
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.set_focus();
            }
        }))?;

        let app_handle = app.handle().clone();
        rolling_logger::init_logger(app_handle.path().app_log_dir()?, "BranchConsole")?;

        let config = ConsoleConfig::load(&app_handle.path().app_config_dir()?)?;
        let db_path = get_db_path(&app_handle)?;

        let console = tauri::async_runtime::block_on(async move {
            let conn = init_db(&db_path).await?;
            let mut console = Console::from_config(&config, Arc::new(SessionRepository::new(conn)))?;
            match console.restore_session().await {
                Ok(Some(info)) => log::info!("[app] resumed as {}", info.display_name),
                Ok(None) => log::info!("[app] no saved session"),
                Err(e) => log::warn!("[app] could not restore session: {}", e),
            }
            Ok::<_, crate::domain::DomainError>(console)
        })?;

        app.manage(AppState {
            console: Mutex::new(console),
        });
        log::info!("[app] setup complete");
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        let result = tauri::Builder::default()
            .plugin(tauri_plugin_dialog::init())
            .setup(setup)
            .invoke_handler(tauri::generate_handler![
                // Auth
                commands::login,
                commands::logout,
                commands::current_session,
                // Dashboard
                commands::load_dashboard,
                // Branches
                commands::list_branches,
                commands::search_branches,
                commands::get_branch,
                commands::submit_branch,
                commands::delete_branch,
                // Follow-ups
                commands::list_follow_ups,
                commands::filter_follow_ups,
                commands::view_follow_up,
                commands::open_follow_up_form,
                commands::submit_follow_up,
                commands::delete_follow_up,
                commands::pick_and_upload_media,
                // Tasks and required items
                commands::list_tasks,
                commands::filter_tasks,
                commands::get_task,
                commands::submit_task,
                commands::delete_task,
                commands::get_required,
                commands::submit_required,
                commands::toggle_requirement,
                commands::delete_required,
                // Logs
                commands::recent_logs,
            ])
            .run(tauri::generate_context!());

        if let Err(e) = result {
            log::error!("[app] error while running tauri application: {}", e);
            std::process::exit(1);
        }
    }
}
