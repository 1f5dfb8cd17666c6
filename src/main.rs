//! Modeler - Main Entry Point
//!
//! A line based shell around the modeler core. Every input line is an
//! action name, optionally followed by JSON options:
//!
//! ```text
//! create-diagram
//! select-tab "next"
//! show-editor {"editor": "xml"}
//! ```

use log::{info, warn};
use modeler::config::{load_config, save_config_silent};
use modeler::files::NativeFileSystem;
use modeler::tabs::DiagramTabProvider;
use modeler::workspaces::JsonWorkspaceStore;
use modeler::{App, AppEvent, Collaborators, Dialog, FileSystem};
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Application name constant.
const APP_NAME: &str = "Modeler";

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();

    let workspace = JsonWorkspaceStore::default_location().unwrap_or_else(|e| {
        warn!("{}; keeping the workspace next to the binary", e);
        JsonWorkspaceStore::new(PathBuf::from("workspace.json"))
    });

    let mut app = App::new(
        settings,
        Collaborators {
            dialog: create_dialog(),
            file_system: Box::new(NativeFileSystem::new()),
            workspace: Box::new(workspace),
        },
        DiagramTabProvider::all(modeler::editor::default_engines()),
    );

    if let Err(e) = app.restore_workspace() {
        warn!("Failed to restore workspace: {}", e);
    }

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if !paths.is_empty() {
        open_paths(&mut app, &paths);
    }
    report(&mut app);

    run(&mut app);
    info!("Application shutting down");
}

#[cfg(feature = "native-dialogs")]
fn create_dialog() -> Box<dyn Dialog> {
    Box::new(modeler::files::NativeDialog::new())
}

#[cfg(not(feature = "native-dialogs"))]
fn create_dialog() -> Box<dyn Dialog> {
    // One byte per read so an answer never swallows the next command
    Box::new(modeler::files::ConsoleDialog::new(
        io::BufReader::with_capacity(1, io::stdin()),
        io::stdout(),
    ))
}

fn open_paths(app: &mut App, paths: &[PathBuf]) {
    let mut fs = NativeFileSystem::new();
    let files = paths
        .iter()
        .filter_map(|path| match fs.read_file(path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        })
        .collect();

    if let Err(e) = app.open_files(files) {
        eprintln!("{}", e);
    }
}

/// Read actions until `quit` succeeds or input ends.
fn run(app: &mut App) {
    let stdin = io::stdin();
    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            warn!("Failed to flush stdout: {}", e);
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                // End of input quits; there is nobody left to ask
                if app.quit().is_err() {
                    warn!("Quit aborted at end of input");
                }
                report(app);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read command: {}", e);
                return;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, options) = parse_command(line);

        let result = match name {
            "list" => {
                list_tabs(app);
                Ok(())
            }
            "open" => {
                let paths: Vec<PathBuf> = options
                    .as_str()
                    .map(|s| s.split_whitespace().map(PathBuf::from).collect())
                    .unwrap_or_default();
                open_paths(app, &paths);
                Ok(())
            }
            "edit" => match options.as_str() {
                Some(path) => edit_from_file(app, Path::new(path)),
                None => Ok(()),
            },
            _ => app.trigger_action(name, &options),
        };

        if let Err(e) = &result {
            if !e.is_canceled() {
                println!("{}", e);
            }
        }
        if report(app) {
            return;
        }
    }
}

/// Split `name rest` where `rest` is JSON, or a bare word taken as a string.
fn parse_command(line: &str) -> (&str, Value) {
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let options = if rest.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(rest).unwrap_or_else(|_| Value::String(rest.to_string()))
    };
    (name, options)
}

/// Replace the active document with the contents of another file.
fn edit_from_file(app: &mut App, path: &Path) -> modeler::Result<()> {
    let raw = NativeFileSystem::new().read_file(path)?;
    app.apply_change(raw.contents)
}

fn list_tabs(app: &App) {
    for tab in app.tabs() {
        let marker = if app.active_tab_id() == Some(tab.id()) { '*' } else { ' ' };
        let dirty = if tab.is_dirty() { " (modified)" } else { "" };
        println!(
            "{} {:>3} {} [{}]{}",
            marker,
            tab.id(),
            tab.file().name,
            tab.active_editor().id(),
            dirty
        );
    }
}

/// Print what happened and persist changed settings. Returns whether the
/// application is quitting.
fn report(app: &mut App) -> bool {
    let mut quitting = false;
    for event in app.take_events() {
        match event {
            AppEvent::TabSelected(id) => {
                if let Some(tab) = app.tab(id) {
                    println!("Selected {}", tab.file().name);
                }
            }
            AppEvent::TabClosed(id) => println!("Closed tab {}", id),
            AppEvent::QuitAborted => println!("Quit aborted"),
            AppEvent::Quitting => quitting = true,
            AppEvent::LogChanged => {
                if let Some(entry) = app.logger().entries().last() {
                    println!("[{}] {}", entry.category, entry.message);
                }
            }
            _ => {}
        }
    }

    if let Some(settings) = app.take_settings_changes() {
        save_config_silent(&settings);
    }
    quitting
}
