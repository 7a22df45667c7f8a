use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// What the watcher last saw on disk.
#[derive(Clone, Copy, Debug, PartialEq)]
enum FileState {
    Modified(SystemTime),
    Missing,
}

impl FileState {
    fn read(path: &Path) -> io::Result<Self> {
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(time) => Ok(Self::Modified(time)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Missing),
            Err(e) => Err(e),
        }
    }
}

/// Watches the deck's file by polling its modification time.
///
/// Editors often save by replacing the file, so it can be briefly missing. That is not an error:
/// the file showing up again counts as a change.
pub struct DeckFileWatcher {
    path: PathBuf,
    state: FileState,
}

impl DeckFileWatcher {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let state = FileState::read(&path).unwrap_or(FileState::Missing);
        Self { path, state }
    }

    /// Check whether the file changed since the last time this was called.
    ///
    /// Any modification time change counts, including going back in time when restoring a backup.
    pub fn has_modifications(&mut self) -> io::Result<bool> {
        let state = FileState::read(&self.path)?;
        let previous = std::mem::replace(&mut self.state, state);
        let changed = match (previous, state) {
            (_, FileState::Missing) => false,
            (FileState::Missing, FileState::Modified(_)) => {
                log::debug!("{} appeared", self.path.display());
                true
            }
            (FileState::Modified(before), FileState::Modified(now)) => before != now,
        };
        Ok(changed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn set_modified(path: &Path, offset: Duration) {
        let file = fs::File::options().write(true).open(path).expect("open failed");
        file.set_modified(SystemTime::now() + offset).expect("setting mtime failed");
    }

    #[test]
    fn detects_modifications() {
        let dir = tempfile::tempdir().expect("no temp dir");
        let path = dir.path().join("deck.md");
        fs::write(&path, "# hi").expect("write failed");

        let mut watcher = DeckFileWatcher::new(&path);
        assert!(!watcher.has_modifications().expect("stat failed"));

        set_modified(&path, Duration::from_secs(5));
        assert!(watcher.has_modifications().expect("stat failed"));
        assert!(!watcher.has_modifications().expect("stat failed"));
    }

    #[test]
    fn older_modification_time() {
        let dir = tempfile::tempdir().expect("no temp dir");
        let path = dir.path().join("deck.md");
        fs::write(&path, "# hi").expect("write failed");
        set_modified(&path, Duration::from_secs(60));

        let mut watcher = DeckFileWatcher::new(&path);
        set_modified(&path, Duration::ZERO);
        assert!(watcher.has_modifications().expect("stat failed"));
    }

    #[test]
    fn replaced_file() {
        let dir = tempfile::tempdir().expect("no temp dir");
        let path = dir.path().join("deck.md");
        fs::write(&path, "# hi").expect("write failed");
        let mut watcher = DeckFileWatcher::new(&path);

        fs::remove_file(&path).expect("remove failed");
        assert!(!watcher.has_modifications().expect("stat failed"));
        assert!(!watcher.has_modifications().expect("stat failed"));

        fs::write(&path, "# hello").expect("write failed");
        assert!(watcher.has_modifications().expect("stat failed"));
        assert!(!watcher.has_modifications().expect("stat failed"));
    }

    #[test]
    fn missing_from_the_start() {
        let dir = tempfile::tempdir().expect("no temp dir");
        let path = dir.path().join("deck.md");
        let mut watcher = DeckFileWatcher::new(&path);
        assert!(!watcher.has_modifications().expect("stat failed"));

        fs::write(&path, "# hi").expect("write failed");
        assert!(watcher.has_modifications().expect("stat failed"));
    }
}
