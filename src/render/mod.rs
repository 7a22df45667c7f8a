pub(crate) mod compose;
pub(crate) mod draw;
pub(crate) mod highlighting;
pub(crate) mod terminal;

use crate::presentation::SlideSequencer;
use std::io;

/// The options that affect how a slide is viewed.
#[derive(Clone, Debug, Default)]
pub struct ViewOptions {
    /// Whether to display the speaker notes under the slide.
    pub show_notes: bool,
}

/// Something that can render a deck.
pub trait DeckRenderer {
    /// Render the visible part of the sequencer's current slide.
    fn render_slide(&mut self, sequencer: &SlideSequencer, options: &ViewOptions) -> RenderResult;

    /// Render an error in place of a slide.
    fn render_error(&mut self, message: &str) -> RenderResult;
}

/// The result of a render operation.
pub type RenderResult = Result<(), RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
}
