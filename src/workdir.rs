use crate::error::ShellError;
use std::path::{Path, PathBuf};

/// The shell's notion of the current directory.
///
/// This is tracked separately from the process working directory: builtins
/// read it and external commands are spawned inside it, but the process
/// itself never calls `chdir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    path: PathBuf,
}

impl WorkingDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Starts from the process's current directory, falling back to `/`.
    pub fn from_process() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Navigates to `target`, as the `cd` builtin does.
    ///
    /// * `~` switches to `home` verbatim; anything after the first segment is ignored.
    /// * A target starting with `.` or `..` is walked segment by segment. Segments
    ///   naming a directory that does not exist are skipped without error.
    /// * Anything else must name an existing directory, otherwise the
    ///   directory is left untouched and [`ShellError::DirectoryNotFound`] is returned.
    pub fn change(&mut self, target: &str, home: Option<&str>) -> Result<(), ShellError> {
        let segments: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

        match segments.first().copied() {
            Some("~") => {
                let home = home.ok_or(ShellError::HomeNotSet)?;
                self.path = PathBuf::from(home);
                Ok(())
            }
            Some(".") | Some("..") => {
                for segment in segments {
                    self.walk(segment);
                }
                Ok(())
            }
            _ => {
                let candidate = self.path.join(target);
                if !target.is_empty() && candidate.is_dir() {
                    self.path = candidate;
                    Ok(())
                } else {
                    Err(ShellError::DirectoryNotFound(target.to_string()))
                }
            }
        }
    }

    fn walk(&mut self, segment: &str) {
        match segment {
            "." => {}
            ".." => {
                // No-op at the root.
                self.path.pop();
            }
            name => {
                let next = self.path.join(name);
                if next.is_dir() {
                    self.path = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    #[test]
    fn absolute_existing_directory_is_adopted_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let mut wd = WorkingDirectory::new("/");
        wd.change(tmp.path().to_str().unwrap(), None).unwrap();
        assert_eq!(wd.path(), tmp.path());
    }

    #[test]
    fn missing_absolute_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let mut wd = WorkingDirectory::new(tmp.path());

        let res = wd.change(missing.to_str().unwrap(), None);

        assert_matches!(res, Err(ShellError::DirectoryNotFound(t)) if t == missing.to_str().unwrap());
        assert_eq!(wd.path(), tmp.path());
    }

    #[test]
    fn plain_file_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, "x").unwrap();
        let mut wd = WorkingDirectory::new(tmp.path());

        assert!(wd.change(file.to_str().unwrap(), None).is_err());
        assert_eq!(wd.path(), tmp.path());
    }

    #[test]
    fn bare_relative_directory_is_resolved_against_current() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let mut wd = WorkingDirectory::new(tmp.path());

        wd.change("sub", None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("sub"));

        assert!(wd.change("nope", None).is_err());
        assert_eq!(wd.path(), tmp.path().join("sub"));
    }

    #[test]
    fn tilde_goes_home_ignoring_rest() {
        let mut wd = WorkingDirectory::new("/");
        wd.change("~/ignored/part", Some("/home/someone")).unwrap();
        assert_eq!(wd.path(), Path::new("/home/someone"));
    }

    #[test]
    fn tilde_without_home_fails() {
        let mut wd = WorkingDirectory::new("/tmp");
        assert_matches!(wd.change("~", None), Err(ShellError::HomeNotSet));
        assert_eq!(wd.path(), Path::new("/tmp"));
    }

    #[test]
    fn dot_segments_walk_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::create_dir(tmp.path().join("c")).unwrap();
        let mut wd = WorkingDirectory::new(tmp.path());

        wd.change("./a/b", None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("a/b"));

        wd.change("../../c", None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("c"));

        wd.change("./.", None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("c"));
    }

    #[test]
    fn unresolvable_segment_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        let mut wd = WorkingDirectory::new(tmp.path());

        wd.change("./ghost/real", None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("real"));
    }

    #[test]
    fn parent_walk_stops_at_root() {
        let mut wd = WorkingDirectory::new("/usr/local/lib");
        for _ in 0..3 {
            wd.change("..", None).unwrap();
        }
        assert_eq!(wd.path(), Path::new("/"));

        wd.change("..", None).unwrap();
        assert_eq!(wd.path(), Path::new("/"));
    }
}
