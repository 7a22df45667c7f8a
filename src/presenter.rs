use crate::{
    bundled,
    deck::Deck,
    input::{source::CommandSource, user::UserCommand},
    markdown::parse::{DeckParser, ParseError},
    presentation::SlideSequencer,
    render::{DeckRenderer, RenderError, ViewOptions},
};
use std::{fs, io, path::PathBuf};

/// Where a deck comes from.
#[derive(Clone, Debug)]
pub enum DeckSource {
    /// The deck that ships with this tool.
    Bundled,

    /// A markdown file.
    File(PathBuf),
}

impl DeckSource {
    /// Load the deck from this source.
    pub fn load(&self) -> Result<Deck, LoadDeckError> {
        match self {
            Self::Bundled => Ok(bundled::scala_conventions()?),
            Self::File(path) => {
                let contents = fs::read_to_string(path).map_err(|e| LoadDeckError::Reading(path.clone(), e))?;
                Ok(DeckParser.parse(&contents)?)
            }
        }
    }

    /// The file that should be watched for changes, if any.
    pub fn watched_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Bundled => None,
            Self::File(path) => Some(path),
        }
    }
}

/// Presents a deck, reacting to commands until the user exits.
pub struct Presenter<R: DeckRenderer> {
    renderer: R,
    source: DeckSource,
    options: ViewOptions,
    sequencer: SlideSequencer,
    error: Option<String>,
}

impl<R: DeckRenderer> Presenter<R> {
    /// Construct a presenter, loading the deck from its source.
    pub fn new(renderer: R, source: DeckSource, options: ViewOptions) -> Result<Self, LoadDeckError> {
        let deck = source.load()?;
        log::info!("loaded deck with {} slides", deck.len());
        Ok(Self { renderer, source, options, sequencer: SlideSequencer::new(deck), error: None })
    }

    /// Run the presentation until the user exits.
    pub fn present(mut self, commands: &mut CommandSource) -> Result<(), PresenterError> {
        loop {
            self.render()?;
            loop {
                let Some(command) = commands.try_next_command()? else {
                    continue;
                };
                log::debug!("applying command {command:?}");
                match self.apply_command(command) {
                    CommandSideEffect::Exit => return Ok(()),
                    CommandSideEffect::Redraw => break,
                    CommandSideEffect::None => (),
                };
            }
        }
    }

    fn render(&mut self) -> Result<(), RenderError> {
        match &self.error {
            Some(error) => self.renderer.render_error(error),
            None => self.renderer.render_slide(&self.sequencer, &self.options),
        }
    }

    fn apply_command(&mut self, command: UserCommand) -> CommandSideEffect {
        // Navigating dismisses a reload error and keeps presenting the previous deck.
        let dismissed_error = !matches!(command, UserCommand::Redraw | UserCommand::Reload | UserCommand::Exit)
            && self.error.take().is_some();
        let changed = match command {
            UserCommand::Redraw => true,
            UserCommand::Next => self.sequencer.advance(),
            UserCommand::Previous => self.sequencer.retreat(),
            UserCommand::FirstSlide => self.sequencer.jump_first(),
            UserCommand::LastSlide => self.sequencer.jump_last(),
            UserCommand::GoToSlide(number) => self.go_to_slide(number),
            UserCommand::ToggleNotes => {
                self.options.show_notes = !self.options.show_notes;
                true
            }
            UserCommand::Reload => {
                self.reload();
                true
            }
            UserCommand::Exit => return CommandSideEffect::Exit,
        };
        let needs_redraw = changed || dismissed_error;
        if needs_redraw { CommandSideEffect::Redraw } else { CommandSideEffect::None }
    }

    fn go_to_slide(&mut self, number: u32) -> bool {
        // Slide numbers are 1-based so 0 can never be valid.
        let Some(index) = (number as usize).checked_sub(1) else {
            log::warn!("ignoring jump to slide 0, slides are numbered from 1");
            return false;
        };
        match self.sequencer.jump_to(index) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("ignoring jump to slide {number}: {e}");
                false
            }
        }
    }

    fn reload(&mut self) {
        match self.source.load() {
            Ok(deck) => {
                log::info!("reloaded deck with {} slides", deck.len());
                self.sequencer.reload(deck);
                self.error = None;
            }
            Err(e) => {
                log::error!("failed to reload deck: {e}");
                self.error = Some(e.to_string());
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum CommandSideEffect {
    Exit,
    Redraw,
    None,
}

#[derive(thiserror::Error, Debug)]
pub enum LoadDeckError {
    #[error("reading '{0}': {1}")]
    Reading(PathBuf, io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(thiserror::Error, Debug)]
pub enum PresenterError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}
