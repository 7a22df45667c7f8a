use super::{highlighting::CodeHighlighter, ViewOptions};
use crate::{
    deck::{CodeSnippet, ContentBlock, Slide},
    markdown::{
        elements::{ListItem, ListItemType, ProseElement, Text, TextStyle},
        prose::ProseParser,
    },
    presentation::SlideSequencer,
};
use crossterm::style::{Color, ContentStyle, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CODE_INDENTATION: usize = 2;

/// A piece of text with a single style.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: ContentStyle,
}

impl Span {
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self { text: text.into(), style: ContentStyle::default() }
    }

    pub fn styled<S: Into<String>>(text: S, style: ContentStyle) -> Self {
        Self { text: text.into(), style }
    }

    fn width(&self) -> usize {
        self.text.width()
    }
}

/// A line ready to be drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawLine {
    pub spans: Vec<Span>,
}

impl DrawLine {
    fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Split this line into lines of at most `width` columns, breaking at spaces when possible.
    pub fn wrap(&self, width: usize) -> Vec<DrawLine> {
        let width = width.max(1);
        if self.width() <= width {
            return vec![self.clone()];
        }
        let mut wrapper = LineWrapper { width, lines: Vec::new(), current: DrawLine::default(), current_width: 0 };
        for span in &self.spans {
            for word in span.text.split_inclusive(' ') {
                wrapper.push_word(word, span.style);
            }
        }
        wrapper.finish()
    }
}

struct LineWrapper {
    width: usize,
    lines: Vec<DrawLine>,
    current: DrawLine,
    current_width: usize,
}

impl LineWrapper {
    fn push_word(&mut self, word: &str, style: ContentStyle) {
        if self.current_width > 0 && self.current_width + word.trim_end().width() > self.width {
            self.break_line();
        }
        let word = if self.current_width == 0 { word.trim_start() } else { word };
        if self.current_width + word.trim_end().width() <= self.width {
            self.push(word, style);
            return;
        }
        // The word doesn't fit in a line of its own so it has to be split.
        let mut piece = String::new();
        for c in word.chars() {
            if self.current_width + piece.width() + c.width().unwrap_or(0) > self.width {
                self.push(&piece, style);
                self.break_line();
                piece.clear();
            }
            piece.push(c);
        }
        self.push(&piece, style);
    }

    fn push(&mut self, text: &str, style: ContentStyle) {
        if text.is_empty() {
            return;
        }
        self.current_width += text.width();
        self.current.spans.push(Span::styled(text, style));
    }

    fn break_line(&mut self) {
        let mut line = std::mem::take(&mut self.current);
        if let Some(last) = line.spans.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
        }
        self.lines.push(line);
        self.current_width = 0;
    }

    fn finish(mut self) -> Vec<DrawLine> {
        if !self.current.spans.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// A slide laid out as lines.
#[derive(Debug, Default)]
pub struct ComposedSlide {
    pub lines: Vec<DrawLine>,
    pub footer: String,
    pub centered: bool,
    pub vertically_centered: bool,
}

/// Turns the visible part of the current slide into lines.
pub struct SlideComposer {
    highlighter: CodeHighlighter,
    prose: ProseParser,
}

impl SlideComposer {
    pub fn new(highlighter: CodeHighlighter) -> Self {
        Self { highlighter, prose: ProseParser }
    }

    pub fn compose(&self, sequencer: &SlideSequencer, options: &ViewOptions, width: usize) -> ComposedSlide {
        let slide = sequencer.current();
        let mut lines = Vec::new();
        if let Some(title) = &slide.title {
            let style = ContentStyle::new().bold().underlined();
            lines.push(DrawLine::new(vec![Span::styled(title, style)]));
            lines.push(DrawLine::default());
        }
        for block in sequencer.visible_blocks() {
            match block {
                ContentBlock::Prose(text) => self.compose_prose(text, width, &mut lines),
                ContentBlock::CodeSnippet(snippet) => self.compose_snippet(snippet, &mut lines),
                ContentBlock::Fragment => continue,
            }
            lines.push(DrawLine::default());
        }
        if options.show_notes {
            Self::compose_notes(slide, width, &mut lines);
        }
        while lines.last().map(DrawLine::is_empty).unwrap_or(false) {
            lines.pop();
        }
        let lines = lines.into_iter().flat_map(|line| line.wrap(width)).collect();
        ComposedSlide {
            lines,
            footer: Self::footer(sequencer),
            centered: slide.has_class("center"),
            vertically_centered: slide.has_class("middle"),
        }
    }

    fn compose_prose(&self, text: &str, width: usize, lines: &mut Vec<DrawLine>) {
        let elements = self.prose.parse(text);
        let total = elements.len();
        for (index, element) in elements.into_iter().enumerate() {
            match element {
                ProseElement::Heading { text, .. } => {
                    let mut line = Self::text_line(&text);
                    for span in &mut line.spans {
                        span.style = span.style.bold();
                    }
                    lines.push(line);
                }
                ProseElement::Paragraph(texts) => lines.extend(texts.iter().map(Self::text_line)),
                ProseElement::List(items) => lines.extend(items.iter().map(Self::list_item_line)),
                ProseElement::BlockQuote(texts) => {
                    for text in &texts {
                        let mut line = Self::text_line(text);
                        for span in &mut line.spans {
                            span.style = span.style.italic();
                        }
                        line.spans.insert(0, Span::styled("▍ ", ContentStyle::new().dim()));
                        lines.push(line);
                    }
                }
                ProseElement::Preformatted(text) => {
                    lines.extend(text.lines().map(|line| DrawLine::new(vec![Span::plain(line)])))
                }
                ProseElement::Rule => lines.push(DrawLine::new(vec![Span::plain("─".repeat(width))])),
            };
            if index + 1 < total {
                lines.push(DrawLine::default());
            }
        }
    }

    fn compose_snippet(&self, snippet: &CodeSnippet, lines: &mut Vec<DrawLine>) {
        let indentation = " ".repeat(CODE_INDENTATION);
        for spans in self.highlighter.highlight(&snippet.code, snippet.language.as_deref()) {
            let mut line = vec![Span::plain(&indentation)];
            line.extend(spans.into_iter().map(|span| Span::styled(span.text, span.style)));
            lines.push(DrawLine::new(line));
        }
    }

    fn compose_notes(slide: &Slide, width: usize, lines: &mut Vec<DrawLine>) {
        let Some(notes) = &slide.notes else {
            return;
        };
        let style = ContentStyle::new().dim().italic();
        lines.push(DrawLine::new(vec![Span::styled("─".repeat(width), ContentStyle::new().dim())]));
        lines.extend(notes.lines().map(|line| DrawLine::new(vec![Span::styled(line, style)])));
    }

    fn text_line(text: &Text) -> DrawLine {
        let spans = text.chunks.iter().map(|chunk| Span::styled(&chunk.text, Self::text_style(chunk.style))).collect();
        DrawLine::new(spans)
    }

    fn text_style(style: TextStyle) -> ContentStyle {
        let mut output = ContentStyle::new();
        if style.is_bold() {
            output = output.bold();
        }
        if style.is_italics() {
            output = output.italic();
        }
        if style.is_strikethrough() {
            output = output.crossed_out();
        }
        if style.is_code() {
            output = output.with(Color::Yellow);
        }
        if style.is_link() {
            output = output.underlined().with(Color::Blue);
        }
        output
    }

    fn list_item_line(item: &ListItem) -> DrawLine {
        let padding = " ".repeat((item.depth as usize + 1) * 2);
        let prefix = match &item.item_type {
            ListItemType::Unordered => {
                let delimiter = match item.depth {
                    0 => '•',
                    1 => '◦',
                    _ => '▪',
                };
                format!("{padding}{delimiter} ")
            }
            ListItemType::Ordered(number) => format!("{padding}{number}. "),
        };
        let mut line = Self::text_line(&item.contents);
        line.spans.insert(0, Span::plain(prefix));
        line
    }

    fn footer(sequencer: &SlideSequencer) -> String {
        let cursor = sequencer.cursor();
        let total = sequencer.deck().len();
        let fragments = sequencer.current().fragment_count();
        if fragments == 0 {
            format!("{} / {total}", cursor.slide + 1)
        } else {
            format!("{} / {total} [{}/{}]", cursor.slide + 1, cursor.fragment + 1, fragments + 1)
        }
    }
}
