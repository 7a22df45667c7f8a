use crate::deck::{ContentBlock, Deck, Slide};

/// A position within a deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// The index of the slide being displayed.
    pub slide: usize,

    /// The number of fragments revealed in that slide.
    pub fragment: usize,
}

impl Cursor {
    pub fn new(slide: usize, fragment: usize) -> Self {
        Self { slide, fragment }
    }
}

/// Walks a deck one slide, or one fragment, at a time.
#[derive(Debug)]
pub struct SlideSequencer {
    deck: Deck,
    cursor: Cursor,
}

impl SlideSequencer {
    /// Construct a sequencer positioned at the first slide with nothing revealed.
    pub fn new(deck: Deck) -> Self {
        Self { deck, cursor: Cursor::default() }
    }

    /// Get the deck being presented.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Get the current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Get the current slide.
    pub fn current(&self) -> &Slide {
        // The cursor is always kept within the deck's bounds and decks are never empty.
        &self.deck.slides()[self.cursor.slide]
    }

    /// Get the current slide index.
    pub fn current_index(&self) -> usize {
        self.cursor.slide
    }

    /// Iterate the blocks in the current slide that have been revealed so far.
    pub fn visible_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.current().iter_visible_blocks(self.cursor.fragment)
    }

    /// Whether we're at the last slide with everything in it revealed.
    pub fn is_terminal(&self) -> bool {
        self.cursor.slide == self.last_index() && self.cursor.fragment == self.current().fragment_count()
    }

    /// Move forward.
    ///
    /// This reveals the next fragment in the current slide if there's one, otherwise moves to the
    /// next slide. Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.cursor.fragment < self.current().fragment_count() {
            self.cursor.fragment += 1;
            return true;
        }
        if self.cursor.slide < self.last_index() {
            // Going forward we show nothing but the first chunk.
            self.cursor = Cursor::new(self.cursor.slide + 1, 0);
            true
        } else {
            false
        }
    }

    /// Move backwards.
    ///
    /// This hides the last revealed fragment in the current slide if there's one, otherwise moves
    /// to the previous slide. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.cursor.fragment > 0 {
            self.cursor.fragment -= 1;
            return true;
        }
        if self.cursor.slide > 0 {
            let slide = self.cursor.slide - 1;
            // Going backwards we show all fragments.
            let fragment = self.deck.slides()[slide].fragment_count();
            self.cursor = Cursor::new(slide, fragment);
            true
        } else {
            false
        }
    }

    /// Jump to a specific slide, with none of its fragments revealed.
    pub fn jump_to(&mut self, index: usize) -> Result<(), OutOfRangeError> {
        if index >= self.deck.len() {
            return Err(OutOfRangeError { index, len: self.deck.len() });
        }
        self.cursor = Cursor::new(index, 0);
        Ok(())
    }

    /// Jump to the first slide.
    pub fn jump_first(&mut self) -> bool {
        self.jump_if_different(0)
    }

    /// Jump to the last slide.
    pub fn jump_last(&mut self) -> bool {
        self.jump_if_different(self.last_index())
    }

    /// Replace the deck being presented.
    ///
    /// The cursor stays where it was as long as it still fits in the new deck.
    pub fn reload(&mut self, deck: Deck) {
        let slide = self.cursor.slide.min(deck.len() - 1);
        let fragment = self.cursor.fragment.min(deck.slides()[slide].fragment_count());
        self.deck = deck;
        self.cursor = Cursor::new(slide, fragment);
    }

    fn jump_if_different(&mut self, index: usize) -> bool {
        let target = Cursor::new(index, 0);
        if self.cursor == target {
            return false;
        }
        self.cursor = target;
        true
    }

    fn last_index(&self) -> usize {
        self.deck.len() - 1
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("slide {index} is out of range, deck has {len} slides")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}
