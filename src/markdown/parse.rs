use crate::deck::{CodeSnippet, ContentBlock, Deck, Slide, SlideProperty, SLIDE_PROPERTY_KEYS};
use std::mem;

type ParseResult<T> = Result<T, ParseError>;

/// The line that separates slides.
pub const SLIDE_SEPARATOR: &str = "---";

/// The line that separates fragments within a slide.
pub const FRAGMENT_SEPARATOR: &str = "--";

/// The line that starts a slide's speaker notes.
pub const NOTES_SEPARATOR: &str = "???";

/// Parses delimited slide text into a deck.
#[derive(Default)]
pub struct DeckParser;

impl DeckParser {
    pub fn parse(&self, contents: &str) -> ParseResult<Deck> {
        if contents.trim().is_empty() {
            return Err(ParseError::EmptyDeck);
        }
        let mut slides = Vec::new();
        let mut builder = SlideBuilder::default();
        let mut fence: Option<OpenFence> = None;
        for (index, line) in contents.lines().enumerate() {
            if let Some(open) = fence.as_mut() {
                let closed = open.closes(line);
                let target = open.target;
                match target {
                    FenceTarget::Snippet if !closed => {
                        open.code.push_str(line);
                        open.code.push('\n');
                    }
                    FenceTarget::Snippet => (),
                    FenceTarget::Prose => builder.push_line(line),
                    FenceTarget::Notes => builder.push_notes_line(line),
                }
                if closed {
                    if let Some(open) = fence.take() {
                        if target == FenceTarget::Snippet {
                            builder.push_code(open.into_snippet());
                        }
                    }
                }
                continue;
            }
            let delimiter = line.trim_end();
            if delimiter == SLIDE_SEPARATOR {
                slides.push(mem::take(&mut builder).build());
            } else if delimiter == NOTES_SEPARATOR && !builder.in_notes {
                builder.start_notes();
            } else if let Some(open) = OpenFence::parse(line, index + 1, builder.in_notes) {
                match open.target {
                    FenceTarget::Snippet => (),
                    FenceTarget::Prose => builder.push_line(line),
                    FenceTarget::Notes => builder.push_notes_line(line),
                }
                fence = Some(open);
            } else if builder.in_notes {
                builder.push_notes_line(line);
            } else if delimiter == FRAGMENT_SEPARATOR {
                builder.push_fragment();
            } else {
                builder.push_line(line);
            }
        }
        if let Some(open) = fence {
            return Err(ParseError::UnterminatedCodeBlock { line: open.line });
        }
        slides.push(builder.build());
        log::debug!("parsed deck with {} slides", slides.len());
        Ok(Deck::new(slides)?)
    }
}

#[derive(Default)]
struct SlideBuilder {
    slide: Slide,
    prose: Vec<String>,
    notes: Vec<String>,
    in_notes: bool,
    // Once we see anything but properties or a title we're in the body.
    in_body: bool,
}

impl SlideBuilder {
    fn push_line(&mut self, line: &str) {
        if !self.in_body {
            if line.trim().is_empty() {
                return;
            }
            if self.slide.title.is_none() {
                if let Some(property) = Self::parse_property(line) {
                    self.slide.properties.push(property);
                    return;
                }
                if let Some(title) = line.strip_prefix("# ") {
                    self.slide.title = Some(title.trim().to_string());
                    self.in_body = true;
                    return;
                }
            }
            self.in_body = true;
        }
        self.prose.push(line.to_string());
    }

    fn push_fragment(&mut self) {
        self.flush_prose();
        self.slide.body.push(ContentBlock::Fragment);
    }

    fn push_code(&mut self, snippet: CodeSnippet) {
        self.flush_prose();
        self.slide.body.push(ContentBlock::CodeSnippet(snippet));
    }

    fn start_notes(&mut self) {
        self.flush_prose();
        self.in_notes = true;
    }

    fn push_notes_line(&mut self, line: &str) {
        self.notes.push(line.to_string());
    }

    fn flush_prose(&mut self) {
        self.in_body = true;
        let lines = mem::take(&mut self.prose);
        if let Some(text) = join_trimmed(&lines) {
            self.slide.body.push(ContentBlock::Prose(text));
        }
    }

    fn parse_property(line: &str) -> Option<SlideProperty> {
        let (key, value) = line.split_once(':')?;
        if !SLIDE_PROPERTY_KEYS.contains(&key) {
            return None;
        }
        Some(SlideProperty::new(key, value.trim()))
    }

    fn build(mut self) -> Slide {
        self.flush_prose();
        self.slide.notes = join_trimmed(&self.notes);
        self.slide
    }
}

// Joins lines after dropping any leading and trailing blank ones.
fn join_trimmed(lines: &[String]) -> Option<String> {
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    let end = lines.iter().rposition(|line| !line.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}

// CommonMark allows fences to be indented by up to this many spaces.
const MAX_FENCE_INDENTATION: usize = 3;

/// Where the lines of a fenced block end up.
#[derive(Clone, Copy, Debug, PartialEq)]
enum FenceTarget {
    /// A code snippet block of its own.
    Snippet,

    /// Part of the surrounding prose, e.g. a fence nested in a list item.
    Prose,

    /// Verbatim speaker notes.
    Notes,
}

struct OpenFence {
    marker: char,
    length: usize,
    language: Option<String>,
    code: String,
    line: usize,
    target: FenceTarget,
}

impl OpenFence {
    fn parse(line: &str, line_number: usize, in_notes: bool) -> Option<Self> {
        let (indentation, fence) = split_indentation(line)?;
        let marker = fence.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let length = fence.chars().take_while(|c| *c == marker).count();
        if length < 3 {
            return None;
        }
        let info = fence[length..].trim();
        // A backtick in a backtick fence's info string makes this an inline code span.
        if marker == '`' && info.contains('`') {
            return None;
        }
        let target = match (in_notes, indentation) {
            (true, _) => FenceTarget::Notes,
            (false, 0) => FenceTarget::Snippet,
            (false, _) => FenceTarget::Prose,
        };
        let language = info.split_whitespace().next().map(ToString::to_string);
        Some(Self { marker, length, language, code: String::new(), line: line_number, target })
    }

    fn closes(&self, line: &str) -> bool {
        let Some((_, fence)) = split_indentation(line.trim_end()) else {
            return false;
        };
        fence.len() >= self.length && fence.chars().all(|c| c == self.marker)
    }

    fn into_snippet(self) -> CodeSnippet {
        CodeSnippet { language: self.language, code: self.code }
    }
}

// Splits the leading spaces off a line, as long as there aren't too many for it to be a fence.
fn split_indentation(line: &str) -> Option<(usize, &str)> {
    let rest = line.trim_start_matches(' ');
    let indentation = line.len() - rest.len();
    (indentation <= MAX_FENCE_INDENTATION).then_some((indentation, rest))
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("the deck has no content")]
    EmptyDeck,

    #[error("code block opened at line {line} is never closed")]
    UnterminatedCodeBlock { line: usize },

    #[error(transparent)]
    Deck(#[from] crate::deck::DeckError),
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn parse(input: &str) -> Deck {
        DeckParser.parse(input).expect("parsing failed")
    }

    fn parse_single(input: &str) -> Slide {
        let deck = parse(input);
        assert_eq!(deck.len(), 1, "expected a single slide");
        deck.slides()[0].clone()
    }

    #[test]
    fn slide_splitting() {
        let deck = parse(
            "First

---
Second
---

Third
",
        );
        let bodies: Vec<_> = deck.iter_slides().map(|slide| slide.body.clone()).collect();
        let expected: Vec<_> = ["First", "Second", "Third"].map(|text| vec![ContentBlock::prose(text)]).to_vec();
        assert_eq!(bodies, expected);
    }

    #[test]
    fn title_and_properties() {
        let slide = parse_single(
            "class: center, middle
name: intro

# Scala conventions

Some text
",
        );
        assert_eq!(slide.title.as_deref(), Some("Scala conventions"));
        assert_eq!(
            slide.properties,
            &[SlideProperty::new("class", "center, middle"), SlideProperty::new("name", "intro")]
        );
        assert_eq!(slide.body, &[ContentBlock::prose("Some text")]);
    }

    #[test]
    fn unknown_property_is_prose() {
        let slide = parse_single("Note: this is prose");
        assert!(slide.properties.is_empty());
        assert_eq!(slide.body, &[ContentBlock::prose("Note: this is prose")]);
    }

    #[test]
    fn late_heading_is_prose() {
        let slide = parse_single("text\n\n# heading");
        assert_eq!(slide.title, None);
        assert_eq!(slide.body, &[ContentBlock::prose("text\n\n# heading")]);
    }

    #[test]
    fn fragments() {
        let slide = parse_single(
            "# Title
one
--
two

--

three",
        );
        let expected = [
            ContentBlock::prose("one"),
            ContentBlock::Fragment,
            ContentBlock::prose("two"),
            ContentBlock::Fragment,
            ContentBlock::prose("three"),
        ];
        assert_eq!(slide.body, expected);
        assert_eq!(slide.fragment_count(), 2);
    }

    #[test]
    fn code_block() {
        let slide = parse_single(
            "Avoid this:
```scala
def f(): Unit = {
---
--
}
```
Do this instead",
        );
        let expected = [
            ContentBlock::prose("Avoid this:"),
            ContentBlock::code(Some("scala"), "def f(): Unit = {\n---\n--\n}\n"),
            ContentBlock::prose("Do this instead"),
        ];
        assert_eq!(slide.body, expected);
    }

    #[rstest]
    #[case::backticks("```\nx\n```", None, "x\n")]
    #[case::tildes("~~~ scala\nx\n~~~", Some("scala"), "x\n")]
    #[case::longer_fence("````scala\n```\n````", Some("scala"), "```\n")]
    #[case::info_string("```scala title=\"x\"\ny\n```", Some("scala"), "y\n")]
    #[case::mismatched_marker("```\n~~~\n```", None, "~~~\n")]
    fn fences(#[case] input: &str, #[case] language: Option<&str>, #[case] code: &str) {
        let slide = parse_single(input);
        assert_eq!(slide.body, &[ContentBlock::code(language, code)]);
    }

    #[test]
    fn inline_code_line_is_prose() {
        let deck = parse("```val x = 1``` is inline code\n---\n# Two\n---\n# Three");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.slides()[0].body, &[ContentBlock::prose("```val x = 1``` is inline code")]);
    }

    #[test]
    fn tilde_fence_info_with_backticks() {
        let slide = parse_single("~~~ scala `x`\nval x = 1\n~~~");
        assert_eq!(slide.body, &[ContentBlock::code(Some("scala"), "val x = 1\n")]);
    }

    #[test]
    fn indented_fence_stays_in_prose() {
        let input = "* item\n\n   ```scala\n   ---\n   --\n   ```\n* next";
        let slide = parse_single(input);
        assert_eq!(slide.body, &[ContentBlock::prose(input)]);
        assert_eq!(slide.fragment_count(), 0);
    }

    #[test]
    fn deeply_indented_fence_is_not_a_fence() {
        let deck = parse("    ```\n---\ntwo");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides()[0].body, &[ContentBlock::prose("    ```")]);
    }

    #[test]
    fn indented_closing_fence() {
        let slide = parse_single("```\nx\n  ```");
        assert_eq!(slide.body, &[ContentBlock::code(None, "x\n")]);
    }

    #[test]
    fn fence_in_notes() {
        let deck = parse("# One\n???\n```yaml\n---\nkey: v\n```\n---\n# Two");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides()[0].notes.as_deref(), Some("```yaml\n---\nkey: v\n```"));
        assert_eq!(deck.slides()[1].title.as_deref(), Some("Two"));
    }

    #[test]
    fn unterminated_fence_in_notes() {
        let result = DeckParser.parse("# One\n???\nnotes\n```\n---\n# Two");
        assert!(matches!(result, Err(ParseError::UnterminatedCodeBlock { line: 4 })), "{result:?}");
    }

    #[test]
    fn unterminated_code_block() {
        let result = DeckParser.parse("# hi\n---\n\n```scala\nval x = 1\n");
        assert!(matches!(result, Err(ParseError::UnterminatedCodeBlock { line: 4 })), "{result:?}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  \n\n \n")]
    fn empty(#[case] input: &str) {
        assert!(matches!(DeckParser.parse(input), Err(ParseError::EmptyDeck)));
    }

    #[test]
    fn notes() {
        let deck = parse(
            "# One
body
???
Remember to mention `Option`.
--
still notes

---
# Two
???

---
# Three",
        );
        let notes: Vec<_> = deck.iter_slides().map(|slide| slide.notes.clone()).collect();
        assert_eq!(notes, &[Some(String::from("Remember to mention `Option`.\n--\nstill notes")), None, None]);
        assert_eq!(deck.slides()[0].body, &[ContentBlock::prose("body")]);
    }

    #[test]
    fn empty_slides_are_kept() {
        let deck = parse("# One\n---\n---\n# Three");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.slides()[1], Slide::default());
    }

    #[test]
    fn separator_with_trailing_whitespace() {
        let deck = parse("one\n---  \ntwo\n--\t\nthree");
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides()[1].fragment_count(), 1);
    }

    #[test]
    fn longer_rules_are_prose() {
        let slide = parse_single("one\n----\ntwo");
        assert_eq!(slide.body, &[ContentBlock::prose("one\n----\ntwo")]);
    }
}
