use crate::{
    deck::Deck,
    markdown::parse::{DeckParser, ParseError},
};

const SCALA_CONVENTIONS: &str = include_str!("../decks/scala-conventions.md");

/// The deck on Scala coding conventions that ships with this tool.
pub fn scala_conventions() -> Result<Deck, ParseError> {
    DeckParser.parse(SCALA_CONVENTIONS)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::deck::ContentBlock;

    #[test]
    fn parses() {
        let deck = scala_conventions().expect("parse failed");
        assert_eq!(deck.len(), 11);
        assert_eq!(deck.title(), Some("Scala conventions"));
    }

    #[test]
    fn title_and_closing_slides() {
        let deck = scala_conventions().expect("parse failed");
        let first = &deck.slides()[0];
        let last = &deck.slides()[deck.len() - 1];
        assert_eq!(first.property("name"), Some("title"));
        assert!(first.has_class("center"));
        assert_eq!(last.title.as_deref(), Some("Thanks!"));
        assert!(last.has_class("middle"));
    }

    #[test]
    fn every_content_slide_has_code() {
        let deck = scala_conventions().expect("parse failed");
        let slides = &deck.slides()[2..deck.len() - 1];
        for slide in slides {
            let has_code = slide.body.iter().any(|block| matches!(block, ContentBlock::CodeSnippet(_)));
            assert!(has_code, "slide {:?} has no code", slide.title);
            assert!(slide.fragment_count() > 0, "slide {:?} has no fragments", slide.title);
        }
    }
}
