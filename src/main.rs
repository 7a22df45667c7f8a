use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use deckhand::{
    CodeHighlighter, CommandSource, Config, ConfigLoadError, Deck, DeckSerializer, DeckSource, HtmlExporter,
    Presenter, SlideComposer, TerminalDrawer, ViewOptions,
};
use directories::ProjectDirs;
use std::{
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
};

/// Present slide decks in your terminal and export them as HTML.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The path to the markdown file that contains the deck.
    ///
    /// The bundled Scala conventions deck is used if none is given.
    path: Option<PathBuf>,

    /// Export the deck as an HTML page to this path rather than presenting it.
    #[clap(long, value_name = "OUT")]
    export_html: Option<PathBuf>,

    /// List the deck's slides and exit.
    #[clap(long, conflicts_with = "export_html")]
    list: bool,

    /// Print the deck back as markdown and exit.
    #[clap(long, conflicts_with_all = ["export_html", "list"])]
    dump: bool,

    /// Display speaker notes under each slide.
    #[clap(long)]
    show_notes: bool,

    /// The theme used to highlight code in the terminal.
    #[clap(short, long)]
    theme: Option<String>,

    /// The highlight style used by exported pages.
    #[clap(long)]
    highlight_style: Option<String>,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<PathBuf>,

    /// Write logs to this file.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Log debug messages.
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn presents(&self) -> bool {
        self.export_html.is_none() && !self.list && !self.dump
    }
}

/// Where log records go.
#[derive(Debug, PartialEq)]
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),

    /// Records are dropped. Anything written to stderr would land on top of the slides.
    Discard,
}

impl<'a> LogTarget<'a> {
    fn new(cli: &'a Cli) -> Self {
        match &cli.log_file {
            Some(path) => Self::File(path),
            None if cli.presents() => Self::Discard,
            None => Self::Stderr,
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    match LogTarget::new(cli) {
        LogTarget::Stderr => (),
        LogTarget::File(path) => {
            let file = File::create(path).with_context(|| format!("creating log file '{}'", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        LogTarget::Discard => return Ok(()),
    };
    builder.init();
    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    let configs_path: PathBuf = match env::var("XDG_CONFIG_HOME") {
        Ok(path) => Path::new(&path).join("deckhand"),
        Err(_) => ProjectDirs::from("", "", "deckhand")?.config_dir().into(),
    };
    Some(configs_path.join("config.yaml"))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config_file {
        log::info!("using config file {}", path.display());
        return Config::load(path).with_context(|| format!("loading config file '{}'", path.display()));
    }
    let Some(path) = default_config_path() else {
        return Ok(Config::default());
    };
    match Config::load(&path) {
        Ok(config) => {
            log::info!("using config file {}", path.display());
            Ok(config)
        }
        Err(ConfigLoadError::NotFound) => {
            log::debug!("no config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("loading config file '{}'", path.display())),
    }
}

fn list_slides(deck: &Deck) {
    for (index, slide) in deck.iter_slides().enumerate() {
        let title = slide.title.as_deref().unwrap_or("<untitled>");
        println!("{:>3}. {title}", index + 1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli)?;
    let mut config = load_config(&cli)?;
    if let Some(style) = &cli.highlight_style {
        config.export.highlight_style = style.clone();
    }
    let source = match &cli.path {
        Some(path) => DeckSource::File(path.clone()),
        None => DeckSource::Bundled,
    };

    if let Some(output) = &cli.export_html {
        let deck = source.load()?;
        HtmlExporter::new(config.export).export_to_path(&deck, output)?;
        println!("exported {} slides to {}", deck.len(), output.display());
        return Ok(());
    } else if cli.list {
        list_slides(&source.load()?);
        return Ok(());
    } else if cli.dump {
        print!("{}", DeckSerializer.serialize(&source.load()?));
        return Ok(());
    }

    let theme = cli.theme.as_deref().unwrap_or(&config.defaults.theme);
    let highlighter = match CodeHighlighter::new(theme) {
        Ok(highlighter) => highlighter,
        Err(e) => Cli::command().error(ErrorKind::InvalidValue, e.to_string()).exit(),
    };
    let options = ViewOptions { show_notes: cli.show_notes || config.defaults.show_notes };
    let mut commands = match source.watched_path() {
        Some(path) => CommandSource::watching(path),
        None => CommandSource::user_only(),
    };
    let drawer = TerminalDrawer::new(io::stdout(), SlideComposer::new(highlighter), config.defaults.max_columns)?;
    let presenter = Presenter::new(drawer, source, options)?;
    presenter.present(&mut commands)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::presenting(&["deckhand", "deck.md"], LogTarget::Discard)]
    #[case::presenting_bundled(&["deckhand", "--verbose"], LogTarget::Discard)]
    #[case::presenting_to_file(&["deckhand", "deck.md", "--log-file", "log.txt"], LogTarget::File(Path::new("log.txt")))]
    #[case::listing(&["deckhand", "deck.md", "--list"], LogTarget::Stderr)]
    #[case::dumping(&["deckhand", "--dump"], LogTarget::Stderr)]
    #[case::exporting(&["deckhand", "--export-html", "out.html"], LogTarget::Stderr)]
    #[case::exporting_to_file(&["deckhand", "--export-html", "out.html", "--log-file", "log.txt"], LogTarget::File(Path::new("log.txt")))]
    fn log_target(#[case] args: &[&str], #[case] expected: LogTarget) {
        let cli = Cli::parse_from(args);
        assert_eq!(LogTarget::new(&cli), expected);
    }

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }
}
