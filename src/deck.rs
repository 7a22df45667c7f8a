/// The keys a slide header may set.
///
/// Anything else at the top of a slide is regular content.
pub const SLIDE_PROPERTY_KEYS: &[&str] = &["name", "class", "layout", "template", "background-image", "count", "exclude"];

/// A deck of slides.
///
/// A deck always contains at least one slide and its slides are in presentation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// Construct a new deck out of a list of slides.
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self { slides })
    }

    /// Iterate the slides in this deck.
    pub fn iter_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Get the slides in this deck.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Get the slide at the given index, if any.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// The number of slides in this deck. This is never zero.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Get the title of the deck, which is the first slide's title.
    pub fn title(&self) -> Option<&str> {
        self.slides.first().and_then(|slide| slide.title.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("a deck needs at least one slide")]
    Empty,
}

/// A slide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Slide {
    /// The slide's title.
    pub title: Option<String>,

    /// The header properties for this slide, in the order they were written.
    pub properties: Vec<SlideProperty>,

    /// The contents of this slide.
    pub body: Vec<ContentBlock>,

    /// The speaker notes.
    pub notes: Option<String>,
}

impl Slide {
    /// The number of fragments that can be revealed in this slide.
    pub fn fragment_count(&self) -> usize {
        self.body.iter().filter(|block| matches!(block, ContentBlock::Fragment)).count()
    }

    /// Iterate the chunks in this slide.
    ///
    /// Chunks are the pieces of the body between fragment markers. There's always one more chunk
    /// than there are fragments.
    pub fn iter_chunks(&self) -> impl Iterator<Item = &[ContentBlock]> {
        self.body.split(|block| matches!(block, ContentBlock::Fragment))
    }

    /// Iterate the blocks that are visible when the given number of fragments are revealed.
    pub fn iter_visible_blocks(&self, revealed_fragments: usize) -> impl Iterator<Item = &ContentBlock> {
        self.iter_chunks().take(revealed_fragments.saturating_add(1)).flat_map(|chunk| chunk.iter())
    }

    /// Get the value of a header property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.iter().find(|property| property.key == key).map(|property| property.value.as_str())
    }

    /// Check whether this slide's `class` property contains the given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.property("class").map(|classes| classes.split(',').any(|c| c.trim() == class)).unwrap_or(false)
    }
}

/// A `key: value` property in a slide's header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideProperty {
    pub key: String,
    pub value: String,
}

impl SlideProperty {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// A block of content within a slide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentBlock {
    /// Markdown text.
    Prose(String),

    /// A code snippet. This is only ever displayed.
    CodeSnippet(CodeSnippet),

    /// The point at which the rest of the slide is revealed on the next step.
    Fragment,
}

impl ContentBlock {
    pub fn prose<S: Into<String>>(text: S) -> Self {
        Self::Prose(text.into())
    }

    pub fn code<S: Into<String>>(language: Option<&str>, code: S) -> Self {
        Self::CodeSnippet(CodeSnippet { language: language.map(Into::into), code: code.into() })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeSnippet {
    /// The language tag, if the snippet had one.
    pub language: Option<String>,

    /// The literal code, with every line terminated by a newline.
    pub code: String,
}
