//! Deckhand: present and export slide decks written as delimited markdown.
//!
//! This is not meant to be used as a crate!

pub(crate) mod bundled;
pub(crate) mod config;
pub(crate) mod deck;
pub(crate) mod export;
pub(crate) mod input;
pub(crate) mod markdown;
pub(crate) mod presentation;
pub(crate) mod presenter;
pub(crate) mod render;

pub use crate::{
    config::{Config, ConfigLoadError, DefaultsConfig, ExportConfig},
    deck::{CodeSnippet, ContentBlock, Deck, DeckError, Slide, SlideProperty},
    export::{ExportError, HtmlExporter},
    input::source::CommandSource,
    markdown::{
        parse::{DeckParser, ParseError},
        serialize::DeckSerializer,
    },
    presentation::{Cursor, OutOfRangeError, SlideSequencer},
    presenter::{DeckSource, LoadDeckError, Presenter, PresenterError},
    render::{
        compose::SlideComposer,
        draw::TerminalDrawer,
        highlighting::{CodeHighlighter, InvalidTheme},
        DeckRenderer, RenderError, RenderResult, ViewOptions,
    },
};
