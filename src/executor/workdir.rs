//! Logical working directory for a batch
//!
//! Every command runs in a fresh process, so a `cd` cannot change our own
//! directory. After a `cd` succeeds we re-derive where it went and start the
//! next command there. This is a string heuristic: `pushd`/`popd`, `cd -`,
//! and paths built from shell variables are not followed.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    current: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
enum CdTarget<'a> {
    Home,
    Path(Cow<'a, str>),
}

impl WorkingDirectory {
    pub fn new(start: PathBuf) -> Self {
        Self { current: start }
    }

    pub fn path(&self) -> &Path {
        &self.current
    }

    /// Follow a successful command if it changed directory.
    ///
    /// Returns `true` when the tracked directory moved.
    pub fn observe(&mut self, command: &str) -> bool {
        self.observe_with_home(command, home_dir().as_deref())
    }

    pub fn observe_with_home(&mut self, command: &str, home: Option<&Path>) -> bool {
        let Some(target) = parse_cd(command) else {
            return false;
        };

        match self.resolve(target, home) {
            Some(next) => {
                tracing::debug!("Working directory: {:?} -> {:?}", self.current, next);
                self.current = next;
                true
            }
            None => {
                tracing::debug!(
                    "Directory change in {:?} did not resolve to a directory; staying in {:?}",
                    command,
                    self.current
                );
                false
            }
        }
    }

    fn resolve(&self, target: CdTarget<'_>, home: Option<&Path>) -> Option<PathBuf> {
        let raw = match target {
            CdTarget::Home => home?.to_path_buf(),
            CdTarget::Path(path) => expand_tilde(&path, home),
        };

        let joined = if raw.is_absolute() {
            raw
        } else {
            self.current.join(raw)
        };

        let canonical = std::fs::canonicalize(&joined).ok()?;
        canonical.is_dir().then_some(canonical)
    }
}

/// Whether a command is, or starts with, a `cd` instruction.
pub fn is_directory_change(command: &str) -> bool {
    command.split_whitespace().next() == Some("cd")
}

fn parse_cd(command: &str) -> Option<CdTarget<'_>> {
    let rest = command.trim_start().strip_prefix("cd")?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim_start();
    if rest.is_empty() {
        return Some(CdTarget::Home);
    }

    if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &rest[1..];
        let end = inner.find(quote).unwrap_or(inner.len());
        return Some(CdTarget::Path(Cow::Borrowed(&inner[..end])));
    }

    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, ';' | '&' | '|'))
        .unwrap_or(rest.len());
    Some(CdTarget::Path(Cow::Borrowed(&rest[..end])))
}

fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return home.to_path_buf();
    }

    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// `HOME`, or `USERPROFILE` on Windows when `HOME` is unset.
pub fn home_dir() -> Option<PathBuf> {
    non_empty_var("HOME")
        .or_else(|| {
            if cfg!(windows) {
                non_empty_var("USERPROFILE")
            } else {
                None
            }
        })
        .map(PathBuf::from)
}

fn non_empty_var(key: &str) -> Option<OsString> {
    std::env::var_os(key).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn canonical(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_is_directory_change() {
        assert!(is_directory_change("cd"));
        assert!(is_directory_change("cd /tmp"));
        assert!(is_directory_change("  cd\tsrc"));
        assert!(!is_directory_change("cdrecord dev"));
        assert!(!is_directory_change("echo cd"));
        assert!(!is_directory_change("pushd /tmp"));
    }

    #[test]
    fn test_parse_cd_targets() {
        assert_eq!(parse_cd("cd"), Some(CdTarget::Home));
        assert_eq!(parse_cd("cd   "), Some(CdTarget::Home));
        assert_eq!(parse_cd("cd src"), Some(CdTarget::Path("src".into())));
        assert_eq!(
            parse_cd("cd src && ls"),
            Some(CdTarget::Path("src".into()))
        );
        assert_eq!(parse_cd("cd src;ls"), Some(CdTarget::Path("src".into())));
        assert_eq!(
            parse_cd("cd \"My Documents\""),
            Some(CdTarget::Path("My Documents".into()))
        );
        assert_eq!(parse_cd("cdx"), None);
        assert_eq!(parse_cd("ls"), None);
    }

    #[test]
    fn test_relative_cd_resolves_against_current() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();

        let mut dir = WorkingDirectory::new(temp.path().to_path_buf());
        assert!(dir.observe_with_home("cd a", None));
        assert!(dir.observe_with_home("cd b", None));
        assert_eq!(dir.path(), canonical(&temp.path().join("a/b")));

        assert!(dir.observe_with_home("cd ..", None));
        assert_eq!(dir.path(), canonical(&temp.path().join("a")));
    }

    #[test]
    fn test_absolute_cd() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("abs");
        std::fs::create_dir(&target).unwrap();

        let mut dir = WorkingDirectory::new(PathBuf::from("/"));
        assert!(dir.observe_with_home(&format!("cd {}", target.display()), None));
        assert_eq!(dir.path(), canonical(&target));
    }

    #[test]
    fn test_missing_target_keeps_previous_directory() {
        let temp = TempDir::new().unwrap();
        let mut dir = WorkingDirectory::new(temp.path().to_path_buf());

        assert!(!dir.observe_with_home("cd does-not-exist", None));
        assert_eq!(dir.path(), temp.path());
    }

    #[test]
    fn test_file_target_keeps_previous_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        let mut dir = WorkingDirectory::new(temp.path().to_path_buf());

        assert!(!dir.observe_with_home("cd notes.txt", None));
        assert_eq!(dir.path(), temp.path());
    }

    #[test]
    fn test_bare_cd_goes_home() {
        let home = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let mut dir = WorkingDirectory::new(work.path().to_path_buf());

        assert!(dir.observe_with_home("cd", Some(home.path())));
        assert_eq!(dir.path(), canonical(home.path()));
    }

    #[test]
    fn test_bare_cd_without_home_stays_put() {
        let work = TempDir::new().unwrap();
        let mut dir = WorkingDirectory::new(work.path().to_path_buf());

        assert!(!dir.observe_with_home("cd", None));
        assert_eq!(dir.path(), work.path());
    }

    #[test]
    fn test_tilde_expansion() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir(home.path().join("projects")).unwrap();
        let mut dir = WorkingDirectory::new(PathBuf::from("/"));

        assert!(dir.observe_with_home("cd ~/projects", Some(home.path())));
        assert_eq!(dir.path(), canonical(&home.path().join("projects")));

        assert!(dir.observe_with_home("cd ~", Some(home.path())));
        assert_eq!(dir.path(), canonical(home.path()));
    }

    #[test]
    fn test_non_cd_commands_are_ignored() {
        let temp = TempDir::new().unwrap();
        let mut dir = WorkingDirectory::new(temp.path().to_path_buf());

        assert!(!dir.observe_with_home("mkdir sub", None));
        assert!(!dir.observe_with_home("echo cd sub", None));
        assert_eq!(dir.path(), temp.path());
    }
}
