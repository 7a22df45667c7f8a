use super::compose::Span;
use crossterm::{
    cursor,
    style::{self, StyledContent},
    terminal, QueueableCommand,
};
use std::io;

/// A wrapper over the terminal write handle.
///
/// The terminal is put in raw mode and switched to the alternate screen while this is alive.
pub(crate) struct Terminal<W>
where
    W: io::Write,
{
    writer: W,
}

impl<W: io::Write> Terminal<W> {
    pub(crate) fn new(writer: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Once built, dropping this restores the terminal even if the setup below fails.
        let mut output = Self { writer };
        output.setup()?;
        Ok(output)
    }

    fn setup(&mut self) -> io::Result<()> {
        self.writer.queue(terminal::EnterAlternateScreen)?;
        self.writer.queue(cursor::Hide)?;
        Ok(())
    }

    pub(crate) fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub(crate) fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.writer.queue(cursor::MoveTo(column, row))?;
        Ok(())
    }

    pub(crate) fn print_span(&mut self, span: &Span) -> io::Result<()> {
        let content = StyledContent::new(span.style, span.text.as_str());
        self.writer.queue(style::PrintStyledContent(content))?;
        Ok(())
    }

    pub(crate) fn print_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.queue(style::Print(text))?;
        Ok(())
    }

    pub(crate) fn clear_screen(&mut self) -> io::Result<()> {
        self.writer.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W> Drop for Terminal<W>
where
    W: io::Write,
{
    fn drop(&mut self) {
        let _ = self.writer.queue(terminal::LeaveAlternateScreen);
        let _ = self.writer.queue(cursor::Show);
        let _ = self.writer.flush();
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    struct BrokenWriter {
        calls: Rc<Cell<usize>>,
    }

    impl io::Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            self.calls.set(self.calls.get() + 1);
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.calls.set(self.calls.get() + 1);
            Err(io::Error::other("broken pipe"))
        }
    }

    #[test]
    fn failed_setup_restores_terminal() {
        let calls = Rc::new(Cell::new(0));
        let mut output = Terminal { writer: BrokenWriter { calls: calls.clone() } };
        assert!(output.setup().is_err());
        let setup_calls = calls.get();

        drop(output);
        assert!(calls.get() > setup_calls, "terminal wasn't restored");
    }
}
