use super::{
    compose::{ComposedSlide, DrawLine, SlideComposer, Span},
    terminal::Terminal,
    DeckRenderer, RenderResult, ViewOptions,
};
use crate::presentation::SlideSequencer;
use crossterm::style::{Color, ContentStyle, Stylize};
use std::io;
use unicode_width::UnicodeWidthStr;

/// The rows at the top and bottom of the screen that slide contents never use.
const VERTICAL_MARGIN: u16 = 1;

/// Draws slides on the terminal.
pub struct TerminalDrawer<W: io::Write> {
    terminal: Terminal<W>,
    composer: SlideComposer,
    max_columns: u16,
}

impl<W: io::Write> TerminalDrawer<W> {
    pub fn new(handle: W, composer: SlideComposer, max_columns: u16) -> io::Result<Self> {
        let terminal = Terminal::new(handle)?;
        Ok(Self { terminal, composer, max_columns })
    }

    fn draw(&mut self, slide: &ComposedSlide, layout: &Layout) -> io::Result<()> {
        self.terminal.clear_screen()?;
        let lines = &slide.lines[..slide.lines.len().min(layout.available_rows() as usize)];
        let first_row = layout.first_row(lines.len(), slide.vertically_centered);
        for (index, line) in lines.iter().enumerate() {
            let column = if slide.centered { layout.centered_column(line.width()) } else { layout.left };
            self.terminal.move_to(column, first_row + index as u16)?;
            for span in &line.spans {
                self.terminal.print_span(span)?;
            }
        }
        let footer_column = layout.right_aligned_column(slide.footer.width());
        self.terminal.move_to(footer_column, layout.rows.saturating_sub(1))?;
        self.terminal.print_text(&slide.footer)?;
        self.terminal.flush()
    }
}

impl<W: io::Write> DeckRenderer for TerminalDrawer<W> {
    fn render_slide(&mut self, sequencer: &SlideSequencer, options: &ViewOptions) -> RenderResult {
        let (columns, rows) = self.terminal.size()?;
        let layout = Layout::new(columns, rows, self.max_columns);
        let slide = self.composer.compose(sequencer, options, layout.width as usize);
        self.draw(&slide, &layout)?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> RenderResult {
        let (columns, rows) = self.terminal.size()?;
        let layout = Layout::new(columns, rows, self.max_columns);
        let style = ContentStyle::new().with(Color::Red).bold();
        let mut lines = vec![DrawLine { spans: vec![Span::styled("Error", style)] }, DrawLine::default()];
        for line in message.lines() {
            let line = DrawLine { spans: vec![Span::plain(line)] };
            lines.extend(line.wrap(layout.width as usize));
        }
        let slide = ComposedSlide { lines, centered: true, vertically_centered: true, ..Default::default() };
        self.draw(&slide, &layout)?;
        Ok(())
    }
}

/// Where the slide goes on the screen.
#[derive(Debug, PartialEq)]
struct Layout {
    columns: u16,
    rows: u16,
    width: u16,
    left: u16,
}

impl Layout {
    fn new(columns: u16, rows: u16, max_columns: u16) -> Self {
        let width = columns.min(max_columns).max(1);
        let left = (columns - width.min(columns)) / 2;
        Self { columns, rows, width, left }
    }

    // The footer takes the last row.
    fn available_rows(&self) -> u16 {
        self.rows.saturating_sub(VERTICAL_MARGIN * 2 + 1)
    }

    fn first_row(&self, lines: usize, vertically_centered: bool) -> u16 {
        if !vertically_centered {
            return VERTICAL_MARGIN;
        }
        let free = self.available_rows().saturating_sub(lines as u16);
        VERTICAL_MARGIN + free / 2
    }

    fn centered_column(&self, line_width: usize) -> u16 {
        let line_width = (line_width as u16).min(self.width);
        self.left + (self.width - line_width) / 2
    }

    fn right_aligned_column(&self, text_width: usize) -> u16 {
        self.columns.saturating_sub(text_width as u16 + 1)
    }
}
