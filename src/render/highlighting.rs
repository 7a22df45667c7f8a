use crossterm::style::{Color, ContentStyle, Stylize};
use syntect::{
    easy::HighlightLines,
    highlighting::{FontStyle, Style, Theme, ThemeSet},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

/// Highlights code snippets.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl CodeHighlighter {
    /// Construct a highlighter using one of the built-in themes.
    pub fn new(theme: &str) -> Result<Self, InvalidTheme> {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let Some(theme) = theme_set.themes.remove(theme) else {
            let valid_themes: Vec<_> = theme_set.themes.keys().cloned().collect();
            return Err(InvalidTheme { name: theme.to_string(), valid_themes });
        };
        Ok(Self { syntax_set, theme })
    }

    /// Highlight a piece of code.
    ///
    /// Languages that aren't known are displayed without any highlighting.
    pub fn highlight(&self, code: &str, language: Option<&str>) -> Vec<Vec<HighlightedSpan>> {
        let syntax = language
            .and_then(|language| self.syntax_set.find_syntax_by_token(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut highlight_lines = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let spans = match highlight_lines.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges.into_iter().map(HighlightedSpan::from).collect(),
                Err(e) => {
                    log::warn!("failed to highlight line: {e}");
                    vec![HighlightedSpan { text: line.to_string(), style: ContentStyle::default() }]
                }
            };
            lines.push(spans.into_iter().map(HighlightedSpan::without_newline).collect());
        }
        lines
    }
}

/// A piece of highlighted code.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightedSpan {
    pub text: String,
    pub style: ContentStyle,
}

impl HighlightedSpan {
    fn without_newline(mut self) -> Self {
        let trimmed = self.text.trim_end_matches(['\n', '\r']).len();
        self.text.truncate(trimmed);
        self
    }
}

impl From<(Style, &str)> for HighlightedSpan {
    fn from((style, text): (Style, &str)) -> Self {
        let mut content_style = ContentStyle::new();
        let color = style.foreground;
        content_style.foreground_color = Some(Color::Rgb { r: color.r, g: color.g, b: color.b });
        if style.font_style.contains(FontStyle::BOLD) {
            content_style = content_style.bold();
        }
        if style.font_style.contains(FontStyle::ITALIC) {
            content_style = content_style.italic();
        }
        if style.font_style.contains(FontStyle::UNDERLINE) {
            content_style = content_style.underlined();
        }
        Self { text: text.to_string(), style: content_style }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid theme '{name}', valid themes are: {}", valid_themes.join(", "))]
pub struct InvalidTheme {
    pub name: String,
    pub valid_themes: Vec<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn highlighter() -> CodeHighlighter {
        CodeHighlighter::new("base16-ocean.dark").expect("theme not found")
    }

    #[test]
    fn invalid_theme() {
        let Err(error) = CodeHighlighter::new("potato") else { panic!("theme found") };
        assert!(error.valid_themes.iter().any(|theme| theme == "base16-ocean.dark"));
    }

    #[test]
    fn highlight_scala() {
        let lines = highlighter().highlight("val x = 1\ndef f = x\n", Some("scala"));
        assert_eq!(lines.len(), 2);
        let text: String = lines[0].iter().map(|span| span.text.as_str()).collect();
        assert_eq!(text, "val x = 1");
        assert!(lines[0].len() > 1, "scala wasn't highlighted");
    }

    #[test]
    fn unknown_language() {
        let lines = highlighter().highlight("hello\n", Some("potato"));
        let text: String = lines[0].iter().map(|span| span.text.as_str()).collect();
        assert_eq!(text, "hello");
    }
}
