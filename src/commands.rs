// Tauri IPC surface. The web front-end renders the desktop and calls in here;
// every window event is pushed back out as "window-event".

use std::sync::Mutex;

use tauri::{Emitter, Manager, State};
use tracing::{error, info};

use crate::audio;
use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::shell::content::WindowContent;
use crate::shell::{ShellController, ShellPhase};
use crate::state::events::WindowCommand;
use crate::state::window::{Point, WindowId, WindowInstance};
use crate::view::taskbar::{StartEntry, TaskbarButton};
use crate::view::{clamp_origin, Viewport};

type Shell<'a> = State<'a, Mutex<ShellController>>;

fn parse_id(id: &str) -> Result<WindowId, String> {
    id.parse().map_err(|e: ShellError| e.to_string())
}

// ===== Window Management Commands =====

#[tauri::command]
fn open_window(id: String, state: Shell) -> Result<WindowInstance, String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.open_window(id).map_err(|e| e.to_string())?;
    shell
        .windows()
        .get(id)
        .cloned()
        .ok_or_else(|| format!("Window not found: {}", id))
}

#[tauri::command]
fn close_window(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    state.lock().map_err(|e| e.to_string())?.close_window(id);
    Ok(())
}

#[tauri::command]
fn minimize_window(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell
        .dispatch(WindowCommand::Minimize { id })
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn toggle_maximize_window(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell
        .dispatch(WindowCommand::ToggleMaximize { id })
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn focus_window(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell
        .dispatch(WindowCommand::Focus { id })
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn update_window_position(id: String, x: f64, y: f64, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell
        .dispatch(WindowCommand::Move {
            id,
            position: Point::new(x, y),
        })
        .map_err(|e| e.to_string())
}

/// Clamp a drag candidate against the current viewport; the front-end calls
/// this on every pointer move before `update_window_position`.
#[tauri::command]
fn clamp_drag_position(x: f64, y: f64, state: Shell) -> Result<Point, String> {
    let shell = state.lock().map_err(|e| e.to_string())?;
    Ok(clamp_origin(Point::new(x, y), &shell.viewport(), &shell.drag_margin()))
}

#[tauri::command]
fn set_viewport(width: f64, height: f64, state: Shell) -> Result<(), String> {
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    let taskbar_height = shell.viewport().taskbar_height;
    shell.set_viewport(Viewport::new(width, height, taskbar_height));
    Ok(())
}

#[tauri::command]
fn list_open_windows(state: Shell) -> Result<Vec<WindowInstance>, String> {
    let shell = state.lock().map_err(|e| e.to_string())?;
    Ok(shell.windows().list_open().into_iter().cloned().collect())
}

#[tauri::command]
fn list_taskbar_windows(state: Shell) -> Result<Vec<WindowInstance>, String> {
    let shell = state.lock().map_err(|e| e.to_string())?;
    Ok(shell
        .windows()
        .list_for_taskbar()
        .into_iter()
        .cloned()
        .collect())
}

#[tauri::command]
fn window_content(id: String, state: Shell) -> Result<WindowContent, String> {
    let id = parse_id(&id)?;
    Ok(state.lock().map_err(|e| e.to_string())?.content(id))
}

// ===== Taskbar & Start Menu =====

#[tauri::command]
fn taskbar_buttons(state: Shell) -> Result<Vec<TaskbarButton>, String> {
    Ok(state.lock().map_err(|e| e.to_string())?.taskbar_buttons())
}

#[tauri::command]
fn taskbar_click(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.taskbar_click(id).map_err(|e| e.to_string())
}

#[tauri::command]
fn toggle_start_menu(state: Shell) -> Result<bool, String> {
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.toggle_start_menu();
    Ok(shell.start_menu().is_open())
}

#[tauri::command]
fn search_start_menu(query: String, state: Shell) -> Result<Vec<StartEntry>, String> {
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.start_menu_mut().set_query(query);
    Ok(shell.start_menu().entries())
}

#[tauri::command]
fn start_menu_select(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.start_menu_select(id).map_err(|e| e.to_string())
}

// ===== Desktop, Phases & Tray =====

#[tauri::command]
fn desktop_icon_click(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    state.lock().map_err(|e| e.to_string())?.icon_click(id);
    Ok(())
}

#[tauri::command]
fn desktop_icon_open(id: String, state: Shell) -> Result<(), String> {
    let id = parse_id(&id)?;
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.icon_open(id).map_err(|e| e.to_string())
}

#[tauri::command]
fn shell_phase(state: Shell) -> Result<ShellPhase, String> {
    Ok(state.lock().map_err(|e| e.to_string())?.phase())
}

#[tauri::command]
fn complete_boot(state: Shell) -> Result<(), String> {
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.complete_boot().map_err(|e| e.to_string())
}

#[tauri::command]
fn login(state: Shell) -> Result<(), String> {
    let mut shell = state.lock().map_err(|e| e.to_string())?;
    shell.login().map_err(|e| e.to_string())
}

#[tauri::command]
fn toggle_mute(state: Shell) -> Result<bool, String> {
    Ok(state.lock().map_err(|e| e.to_string())?.toggle_mute())
}

#[tauri::command]
fn toggle_theme(state: Shell) -> Result<bool, String> {
    Ok(state.lock().map_err(|e| e.to_string())?.toggle_theme())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // The output stream must outlive the app, else audio stops.
    let (player, _output) = audio::default_player();

    let shell = match ShellController::new(&ShellConfig::default(), player) {
        Ok(shell) => shell,
        Err(e) => {
            error!("failed to build shell: {}", e);
            return;
        }
    };

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(Mutex::new(shell))
        .setup(|app| {
            let handle = app.handle().clone();
            let state = app.state::<Mutex<ShellController>>();
            let mut shell = state.lock().map_err(|e| e.to_string())?;
            shell.subscribe(move |event| {
                if let Err(e) = handle.emit("window-event", event) {
                    error!("failed to emit window event: {}", e);
                }
            });
            info!("window event bridge initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Windows
            open_window,
            close_window,
            minimize_window,
            toggle_maximize_window,
            focus_window,
            update_window_position,
            clamp_drag_position,
            set_viewport,
            list_open_windows,
            list_taskbar_windows,
            window_content,
            // Taskbar & start menu
            taskbar_buttons,
            taskbar_click,
            toggle_start_menu,
            search_start_menu,
            start_menu_select,
            // Desktop, phases & tray
            desktop_icon_click,
            desktop_icon_open,
            shell_phase,
            complete_boot,
            login,
            toggle_mute,
            toggle_theme,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!("error while running tauri application: {}", e);
    }
}
