/// A block element within a piece of prose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProseElement {
    /// A heading.
    Heading { level: u8, text: Text },

    /// A paragraph, split at hard line breaks.
    Paragraph(Vec<Text>),

    /// A list, flattened so nested items carry their depth.
    List(Vec<ListItem>),

    /// A block quote, one entry per line.
    BlockQuote(Vec<Text>),

    /// Text that must be displayed as is.
    Preformatted(String),

    /// A thematic break.
    Rule,
}

/// A piece of text made up of chunks that each have their own style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    pub chunks: Vec<StyledText>,
}

#[cfg(test)]
impl Text {
    /// The text without any styling.
    pub fn plain_text(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub style: TextStyle,
}

impl StyledText {
    #[cfg(test)]
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self { text: text.into(), style: TextStyle::default() }
    }

    pub fn styled<S: Into<String>>(text: S, style: TextStyle) -> Self {
        Self { text: text.into(), style }
    }
}

/// The style of a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStyle(u8);

impl TextStyle {
    pub fn bold(self) -> Self {
        self.add_flag(TextStyleFlags::Bold)
    }

    pub fn italics(self) -> Self {
        self.add_flag(TextStyleFlags::Italics)
    }

    pub fn strikethrough(self) -> Self {
        self.add_flag(TextStyleFlags::Strikethrough)
    }

    pub fn code(self) -> Self {
        self.add_flag(TextStyleFlags::Code)
    }

    pub fn link(self) -> Self {
        self.add_flag(TextStyleFlags::Link)
    }

    pub fn is_bold(&self) -> bool {
        self.has_flag(TextStyleFlags::Bold)
    }

    pub fn is_italics(&self) -> bool {
        self.has_flag(TextStyleFlags::Italics)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.has_flag(TextStyleFlags::Strikethrough)
    }

    pub fn is_code(&self) -> bool {
        self.has_flag(TextStyleFlags::Code)
    }

    pub fn is_link(&self) -> bool {
        self.has_flag(TextStyleFlags::Link)
    }

    fn add_flag(mut self, flag: TextStyleFlags) -> Self {
        self.0 |= flag as u8;
        self
    }

    fn has_flag(&self, flag: TextStyleFlags) -> bool {
        self.0 & flag as u8 != 0
    }
}

#[derive(Debug)]
enum TextStyleFlags {
    Bold = 1,
    Italics = 2,
    Strikethrough = 4,
    Code = 8,
    Link = 16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    pub depth: u8,
    pub contents: Text,
    pub item_type: ListItemType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListItemType {
    Unordered,
    Ordered(usize),
}
