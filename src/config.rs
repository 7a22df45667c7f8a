use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fs, io, path::Path};

const DEFAULT_SCRIPT: &str = "https://remarkjs.com/downloads/remark-latest.min.js";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The default configuration for presenting.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// The configuration for HTML exports.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load the config from a path.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigLoadError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config file not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// The theme used to highlight code snippets in the terminal.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Whether to display speaker notes under each slide.
    #[serde(default)]
    pub show_notes: bool,

    /// A max width in columns that slides are always capped to.
    #[serde(default = "default_max_columns")]
    pub max_columns: u16,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { theme: default_theme(), show_notes: false, max_columns: default_max_columns() }
    }
}

fn default_theme() -> String {
    "base16-ocean.dark".into()
}

fn default_max_columns() -> u16 {
    100
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// The syntax highlighting style the runtime should use.
    #[serde(default = "default_highlight_style")]
    pub highlight_style: String,

    /// The path to the stylesheet, relative to the exported page.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,

    /// The location of the runtime script.
    #[serde(default = "default_script")]
    pub script: String,

    /// Any other options to pass to the runtime verbatim.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            highlight_style: default_highlight_style(),
            stylesheet: default_stylesheet(),
            script: default_script(),
            options: Default::default(),
        }
    }
}

fn default_highlight_style() -> String {
    "github".into()
}

fn default_stylesheet() -> String {
    "style.css".into()
}

fn default_script() -> String {
    DEFAULT_SCRIPT.into()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("no temp file");
        file.write_all(contents.as_bytes()).expect("write failed");
        file
    }

    #[test]
    fn full_config() {
        let file = write_config(
            r#"
defaults:
  theme: Solarized (dark)
  show_notes: true
  max_columns: 80
export:
  highlight_style: monokai
  stylesheet: css/deck.css
  script: remark.js
  options:
    ratio: "16:9"
    highlightLines: true
"#,
        );
        let config = Config::load(file.path()).expect("loading failed");
        assert_eq!(config.defaults.theme, "Solarized (dark)");
        assert!(config.defaults.show_notes);
        assert_eq!(config.defaults.max_columns, 80);
        assert_eq!(config.export.highlight_style, "monokai");
        assert_eq!(config.export.stylesheet, "css/deck.css");
        assert_eq!(config.export.script, "remark.js");
        assert_eq!(config.export.options.get("ratio"), Some(&Value::String("16:9".into())));
        assert_eq!(config.export.options.get("highlightLines"), Some(&Value::Bool(true)));
    }

    #[test]
    fn defaults() {
        let file = write_config("export:\n  highlight_style: zenburn\n");
        let config = Config::load(file.path()).expect("loading failed");
        assert_eq!(config.defaults.theme, "base16-ocean.dark");
        assert_eq!(config.defaults.max_columns, 100);
        assert_eq!(config.export.stylesheet, "style.css");
        assert_eq!(config.export.script, DEFAULT_SCRIPT);
    }

    #[test]
    fn unknown_fields() {
        let file = write_config("defaults:\n  potato: true\n");
        assert!(matches!(Config::load(file.path()), Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().expect("no temp dir");
        let result = Config::load(&dir.path().join("config.yaml"));
        assert!(matches!(result, Err(ConfigLoadError::NotFound)));
    }
}
