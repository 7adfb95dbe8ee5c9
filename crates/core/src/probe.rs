//! Environment lookups, behind a trait so the engine can be tested without
//! a real terminal or real executables.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::stdout;
use std::path::{Path, PathBuf};

use crossterm::terminal;
use crossterm::tty::IsTty;

pub trait EnvironmentProbe {
    /// A non-empty environment variable.
    fn var(&self, key: &str) -> Option<String>;

    /// Resolves an executable name to a path.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    fn stdout_is_terminal(&self) -> bool;

    fn terminal_width(&self) -> Option<u16>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl EnvironmentProbe for SystemProbe {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if name.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }
        std::env::var_os("PATH").and_then(|path| find_in_path(name, &path))
    }

    fn stdout_is_terminal(&self) -> bool {
        stdout().is_tty()
    }

    fn terminal_width(&self) -> Option<u16> {
        terminal::size().ok().map(|(width, _)| width)
    }
}

/// Searches the directories of a `PATH`-style list for `name`.
pub fn find_in_path(name: &str, path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|directory| directory.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A fixed environment, for tests and for programs that want to control
/// how help is presented.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    vars: HashMap<String, String>,
    executables: HashMap<String, PathBuf>,
    terminal: bool,
    width: Option<u16>,
}

impl StaticProbe {
    #[must_use]
    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn executable(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.executables.insert(name.to_string(), path.into());
        self
    }

    #[must_use]
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }
}

impl EnvironmentProbe for StaticProbe {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|value| !value.is_empty()).cloned()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables.get(name).cloned()
    }

    fn stdout_is_terminal(&self) -> bool {
        self.terminal
    }

    fn terminal_width(&self) -> Option<u16> {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = path.metadata().unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(path, permissions).unwrap();
    }

    #[cfg(not(unix))]
    fn make_executable(_path: &Path) {}

    #[test]
    fn test_find_in_path() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let pager = second.path().join("mypager");
        File::create(&pager).unwrap();
        make_executable(&pager);

        let path = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(find_in_path("mypager", &path), Some(pager));
        assert_eq!(find_in_path("missing", &path), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_files_are_skipped() {
        let directory = TempDir::new().unwrap();
        File::create(directory.path().join("plain")).unwrap();
        let path = std::env::join_paths([directory.path()]).unwrap();
        assert_eq!(find_in_path("plain", &path), None);
    }

    #[test]
    fn test_static_probe() {
        let probe = StaticProbe::default()
            .var("TERM", "xterm")
            .var("EMPTY", "")
            .executable("less", "/usr/bin/less")
            .terminal(true)
            .width(100);
        assert_eq!(EnvironmentProbe::var(&probe, "TERM"), Some("xterm".to_string()));
        assert_eq!(EnvironmentProbe::var(&probe, "EMPTY"), None);
        assert_eq!(probe.find_executable("less"), Some(PathBuf::from("/usr/bin/less")));
        assert!(probe.stdout_is_terminal());
        assert_eq!(probe.terminal_width(), Some(100));
    }
}
