use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{io, time::Duration};

/// Turns key presses into commands.
///
/// Some commands take more than one key (`gg`, `12G`) so this keeps the keys typed so far.
#[derive(Default)]
pub struct UserInput {
    state: InputState,
}

impl UserInput {
    pub fn poll_next_command(&mut self, timeout: Duration) -> io::Result<Option<UserCommand>> {
        if poll(timeout)? { self.next_command() } else { Ok(None) }
    }

    pub fn next_command(&mut self) -> io::Result<Option<UserCommand>> {
        let command = match read()? {
            Event::Key(event) => self.handle_key_event(&event),
            Event::Resize(..) => Some(UserCommand::Redraw),
            _ => None,
        };
        Ok(command)
    }

    pub(crate) fn handle_key_event(&mut self, event: &KeyEvent) -> Option<UserCommand> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let command = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(UserCommand::Exit),
            KeyCode::Char('r') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(UserCommand::Reload),
            KeyCode::Char('h')
            | KeyCode::Char('k')
            | KeyCode::Left
            | KeyCode::PageUp
            | KeyCode::Up
            | KeyCode::Backspace => Some(UserCommand::Previous),
            KeyCode::Char('l')
            | KeyCode::Char('j')
            | KeyCode::Right
            | KeyCode::PageDown
            | KeyCode::Down
            | KeyCode::Char(' ')
            | KeyCode::Enter => Some(UserCommand::Next),
            KeyCode::Char('q') => Some(UserCommand::Exit),
            KeyCode::Char('n') => Some(UserCommand::ToggleNotes),
            KeyCode::Char('G') => self.handle_uppercase_g(),
            KeyCode::Char('g') => return self.handle_lowercase_g(),
            KeyCode::Char(number) if number.is_ascii_digit() => {
                if let Some(number) = number.to_digit(10) {
                    self.handle_number(number);
                }
                return None;
            }
            _ => None,
        };
        self.state.reset();
        command
    }

    fn handle_lowercase_g(&mut self) -> Option<UserCommand> {
        match self.state {
            InputState::PendingG => {
                self.state.reset();
                Some(UserCommand::FirstSlide)
            }
            InputState::Empty => {
                self.state = InputState::PendingG;
                None
            }
            _ => {
                self.state.reset();
                None
            }
        }
    }

    fn handle_uppercase_g(&self) -> Option<UserCommand> {
        match self.state {
            InputState::Empty => Some(UserCommand::LastSlide),
            InputState::PendingNumber(number) => Some(UserCommand::GoToSlide(number)),
            _ => None,
        }
    }

    fn handle_number(&mut self, number: u32) {
        let maybe_next = match self.state {
            InputState::PendingNumber(current) => current.checked_mul(10).and_then(|n| n.checked_add(number)),
            InputState::Empty => Some(number),
            InputState::OverflowedNumber => {
                return;
            }
            InputState::PendingG => {
                self.state.reset();
                return;
            }
        };
        // Overflowing is a terminal state so 123123123123G doesn't alias G.
        match maybe_next {
            Some(number) => self.state = InputState::PendingNumber(number),
            None => self.state = InputState::OverflowedNumber,
        };
    }
}

/// A command typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserCommand {
    /// Redraw the current slide, e.g. after the terminal is resized.
    Redraw,

    /// Reveal the next fragment or move to the next slide.
    Next,

    /// Hide the last fragment or move to the previous slide.
    Previous,

    FirstSlide,

    LastSlide,

    /// Jump to a slide by its 1-based number.
    GoToSlide(u32),

    /// Show or hide speaker notes.
    ToggleNotes,

    /// Load the deck from its source again.
    Reload,

    Exit,
}

#[derive(Debug, Default, PartialEq)]
enum InputState {
    #[default]
    Empty,
    PendingG,
    PendingNumber(u32),
    OverflowedNumber,
}

impl InputState {
    fn reset(&mut self) {
        *self = InputState::Empty;
    }
}
