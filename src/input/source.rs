use super::{
    fs::DeckFileWatcher,
    user::{UserCommand, UserInput},
};
use std::{io, path::PathBuf, time::Duration};

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// The source of commands.
///
/// This waits for user commands and, when presenting a file, watches it so the deck is reloaded
/// whenever it changes.
pub struct CommandSource {
    watcher: Option<DeckFileWatcher>,
    user_input: UserInput,
}

impl CommandSource {
    /// Create a command source that also watches the file at the given path.
    pub fn watching<P: Into<PathBuf>>(path: P) -> Self {
        Self { watcher: Some(DeckFileWatcher::new(path)), user_input: UserInput::default() }
    }

    /// Create a command source that only listens to the user.
    pub fn user_only() -> Self {
        Self { watcher: None, user_input: UserInput::default() }
    }

    /// Try to get the next command.
    ///
    /// This returns `Ok(None)` if nothing happened before the poll timeout.
    pub fn try_next_command(&mut self) -> io::Result<Option<UserCommand>> {
        if let Some(command) = self.user_input.poll_next_command(POLL_TIMEOUT)? {
            return Ok(Some(command));
        };
        let Some(watcher) = &mut self.watcher else {
            return Ok(None);
        };
        if watcher.has_modifications()? { Ok(Some(UserCommand::Reload)) } else { Ok(None) }
    }
}
