//! Individual intent handlers
//!
//! Each handler validates its parameters and performs one OS action.
//! Shutdown and restart are dry runs: they only report the command.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::thread;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::ActionOutcome;
use crate::intent::Parameters;

pub(super) const MAX_SEARCH_RESULTS: usize = 10;

/// Data every handler may consult
pub struct HandlerContext {
    /// Value of `std::env::consts::OS`
    pub platform: &'static str,
    pub search_root: PathBuf,
}

pub type Handler = fn(&HandlerContext, &Parameters) -> ActionOutcome;

/// String parameter, empty when absent or not a string
fn param<'a>(parameters: &'a Parameters, key: &str) -> &'a str {
    parameters
        .get(key)
        .and_then(|value| value.as_str())
        .unwrap_or("")
}

/// Launch a process without waiting for it; a reaper thread collects its
/// exit status so finished children never linger as zombies.
fn spawn_detached(program: &str, args: &[&str]) -> io::Result<()> {
    debug!(program, ?args, "spawning process");
    let child = Command::new(program).args(args).spawn()?;
    reap_in_background(child);
    Ok(())
}

fn reap_in_background(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name("child-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "spawned process exited"),
            Err(e) => warn!(pid, error = %e, "failed to wait for spawned process"),
        });
    if let Err(e) = spawned {
        warn!(pid, error = %e, "failed to start reaper thread");
    }
}

/// Only a cross-filesystem rename warrants the copy + remove fallback
pub(super) fn crosses_devices(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::CrossesDevices
}

pub fn open_app(ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let name = param(parameters, "name");
    if name.is_empty() {
        return ActionOutcome::failed("Application name missing.");
    }

    let result = match ctx.platform {
        "windows" => spawn_detached("cmd", &["/C", "start", "", name]),
        "macos" => spawn_detached("open", &["-a", name]),
        _ => spawn_detached(name, &[]),
    };

    match result {
        Ok(()) => ActionOutcome::ok(format!("Opening {name}.")),
        Err(e) => ActionOutcome::failed(format!("Failed to open app: {e}")),
    }
}

pub fn close_app(ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let name = param(parameters, "name");
    if name.is_empty() {
        return ActionOutcome::failed("Application name missing.");
    }

    // Exit status is ignored: no matching process is not an error
    let result = match ctx.platform {
        "windows" => Command::new("taskkill").args(["/IM", name, "/F"]).status(),
        _ => Command::new("pkill").args(["-f", name]).status(),
    };

    match result {
        Ok(_) => ActionOutcome::ok(format!("Closing {name}.")),
        Err(e) => ActionOutcome::failed(format!("Failed to close app: {e}")),
    }
}

pub fn browse(ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let url = param(parameters, "url");
    if url.is_empty() {
        return ActionOutcome::failed("URL missing.");
    }

    let result = match ctx.platform {
        "windows" => spawn_detached("cmd", &["/C", "start", "", url]),
        "macos" => spawn_detached("open", &[url]),
        _ => spawn_detached("xdg-open", &[url]),
    };

    match result {
        Ok(()) => ActionOutcome::ok(format!("Opening {url}.")),
        Err(e) => ActionOutcome::failed(format!("Failed to open browser: {e}")),
    }
}

pub fn create_file(_ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let path = param(parameters, "path");
    if path.is_empty() {
        return ActionOutcome::failed("File path missing.");
    }

    let path = Path::new(path);
    let result = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| {
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(|_| ())
        });

    match result {
        Ok(()) => ActionOutcome::ok(format!("Created file at {}.", path.display())),
        Err(e) => ActionOutcome::failed(format!("Failed to create file: {e}")),
    }
}

pub fn delete_file(_ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let path = param(parameters, "path");
    if path.is_empty() {
        return ActionOutcome::failed("File path missing.");
    }

    let path = Path::new(path);
    if !path.exists() {
        return ActionOutcome::failed("File not found.");
    }

    match fs::remove_file(path) {
        Ok(()) => ActionOutcome::ok(format!("Deleted file at {}.", path.display())),
        Err(e) => ActionOutcome::failed(format!("Failed to delete file: {e}")),
    }
}

/// Moving onto a directory keeps the file name, like `mv`
fn resolve_destination(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

pub fn move_file(_ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let source = param(parameters, "source");
    let destination = param(parameters, "destination");
    if source.is_empty() || destination.is_empty() {
        return ActionOutcome::failed("Source or destination missing.");
    }

    let target = resolve_destination(Path::new(source), Path::new(destination));
    let result = fs::rename(source, &target).or_else(|e| {
        if !crosses_devices(&e) {
            return Err(e);
        }
        warn!(error = %e, "rename crosses filesystems, copying instead");
        fs::copy(source, &target).and_then(|_| fs::remove_file(source))
    });

    match result {
        Ok(()) => ActionOutcome::ok(format!("Moved {source} to {destination}.")),
        Err(e) => ActionOutcome::failed(format!("Failed to move file: {e}")),
    }
}

pub fn copy_file(_ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let source = param(parameters, "source");
    let destination = param(parameters, "destination");
    if source.is_empty() || destination.is_empty() {
        return ActionOutcome::failed("Source or destination missing.");
    }

    let target = resolve_destination(Path::new(source), Path::new(destination));
    match fs::copy(source, &target) {
        Ok(_) => ActionOutcome::ok(format!("Copied {source} to {destination}.")),
        Err(e) => ActionOutcome::failed(format!("Failed to copy file: {e}")),
    }
}

pub fn search_files(ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    let query = param(parameters, "query");
    if query.is_empty() {
        return ActionOutcome::failed("Search query missing.");
    }

    let needle = query.to_lowercase();
    let matches: Vec<String> = WalkDir::new(&ctx.search_root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
        })
        .take(MAX_SEARCH_RESULTS)
        .map(|entry| entry.path().display().to_string())
        .collect();

    if matches.is_empty() {
        return ActionOutcome::ok("No files found.");
    }
    ActionOutcome::ok(format!("Found files:\n{}", matches.join("\n")))
}

pub fn shutdown(ctx: &HandlerContext, _parameters: &Parameters) -> ActionOutcome {
    let command = match ctx.platform {
        "windows" => "shutdown /s /t 0",
        "macos" => "sudo shutdown -h now",
        _ => "shutdown now",
    };
    ActionOutcome::failed(format!("Shutdown command prepared: {command}"))
}

pub fn restart(ctx: &HandlerContext, _parameters: &Parameters) -> ActionOutcome {
    let command = match ctx.platform {
        "windows" => "shutdown /r /t 0",
        "macos" => "sudo shutdown -r now",
        _ => "shutdown -r now",
    };
    ActionOutcome::failed(format!("Restart command prepared: {command}"))
}

pub fn lock(_ctx: &HandlerContext, _parameters: &Parameters) -> ActionOutcome {
    ActionOutcome::ok("Locking session.")
}

pub fn unknown(_ctx: &HandlerContext, parameters: &Parameters) -> ActionOutcome {
    ActionOutcome::failed(format!("I didn't understand: {}", param(parameters, "text")))
}
