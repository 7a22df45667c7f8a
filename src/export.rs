use crate::{config::ExportConfig, deck::Deck, markdown::serialize::DeckSerializer};
use html::{escape_attribute, escape_text};
use serde_json::{Map, Value};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

pub(crate) mod html;

const DEFAULT_TITLE: &str = "Slides";

/// Exports decks as an HTML page that is displayed by an external slideshow runtime.
///
/// The page embeds the deck's delimited text and loads the runtime script and stylesheet by
/// reference. Neither of them is part of the output.
pub struct HtmlExporter {
    config: ExportConfig,
    serializer: DeckSerializer,
}

impl HtmlExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config, serializer: DeckSerializer }
    }

    /// Export a deck into a file.
    pub fn export_to_path(&self, deck: &Deck, path: &Path) -> Result<(), ExportError> {
        let file = fs::File::create(path).map_err(|e| ExportError::Create(path.into(), e))?;
        let mut writer = io::BufWriter::new(file);
        self.export(deck, &mut writer)?;
        writer.flush()?;
        log::info!("exported {} slides to {}", deck.len(), path.display());
        Ok(())
    }

    /// Export a deck into the given writer.
    pub fn export<W: Write>(&self, deck: &Deck, mut writer: W) -> Result<(), ExportError> {
        let title = escape_text(deck.title().unwrap_or(DEFAULT_TITLE));
        let stylesheet = escape_attribute(&self.config.stylesheet);
        let script = escape_attribute(&self.config.script);
        let source = escape_text(&self.serializer.serialize(deck));
        let runtime_config = serde_json::to_string(&self.runtime_config())?;
        write!(
            writer,
            r#"<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <meta charset="utf-8">
    <link rel="stylesheet" href="{stylesheet}">
  </head>
  <body>
    <textarea id="source">
{source}
    </textarea>
    <script src="{script}"></script>
    <script>
      var slideshow = remark.create({runtime_config});
    </script>
  </body>
</html>
"#
        )?;
        Ok(())
    }

    /// The configuration map handed over to the runtime.
    pub fn runtime_config(&self) -> Map<String, Value> {
        let mut config: Map<String, Value> =
            self.config.options.iter().map(|(key, value)| (key.clone(), value.clone())).collect();
        config.insert("highlightStyle".into(), Value::String(self.config.highlight_style.clone()));
        config
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("creating {0}: {1}")]
    Create(PathBuf, io::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("serializing runtime configuration: {0}")]
    Config(#[from] serde_json::Error),
}
