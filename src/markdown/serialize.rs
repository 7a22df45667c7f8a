use super::parse::{FRAGMENT_SEPARATOR, NOTES_SEPARATOR, SLIDE_SEPARATOR};
use crate::deck::{CodeSnippet, ContentBlock, Deck, Slide};

/// Turns a deck back into delimited slide text.
#[derive(Default)]
pub struct DeckSerializer;

impl DeckSerializer {
    pub fn serialize(&self, deck: &Deck) -> String {
        let slides: Vec<_> = deck.iter_slides().map(Self::serialize_slide).collect();
        let mut output = slides.join(&format!("\n{SLIDE_SEPARATOR}\n"));
        output.push('\n');
        output
    }

    fn serialize_slide(slide: &Slide) -> String {
        let mut sections = Vec::new();
        if !slide.properties.is_empty() {
            let properties: Vec<_> =
                slide.properties.iter().map(|property| format!("{}: {}", property.key, property.value)).collect();
            sections.push(properties.join("\n"));
        }
        if let Some(title) = &slide.title {
            sections.push(format!("# {title}"));
        }
        for block in &slide.body {
            let section = match block {
                ContentBlock::Prose(text) => text.clone(),
                ContentBlock::CodeSnippet(snippet) => Self::serialize_snippet(snippet),
                ContentBlock::Fragment => FRAGMENT_SEPARATOR.to_string(),
            };
            sections.push(section);
        }
        if let Some(notes) = &slide.notes {
            sections.push(format!("{NOTES_SEPARATOR}\n{notes}"));
        }
        sections.join("\n\n")
    }

    fn serialize_snippet(snippet: &CodeSnippet) -> String {
        // The fence needs to be longer than anything inside that looks like a closing fence.
        let longest_inner = snippet
            .code
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().all(|c| c == '`'))
            .map(str::len)
            .max()
            .unwrap_or(0);
        let fence = "`".repeat(longest_inner.max(2) + 1);
        let language = snippet.language.as_deref().unwrap_or_default();
        let mut output = format!("{fence}{language}\n{}", snippet.code);
        if !snippet.code.is_empty() && !snippet.code.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&fence);
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        deck::SlideProperty,
        markdown::parse::DeckParser,
    };
    use rstest::rstest;

    fn round_trip(deck: &Deck) -> Deck {
        let text = DeckSerializer.serialize(deck);
        DeckParser.parse(&text).unwrap_or_else(|e| panic!("parsing failed: {e}\n{text}"))
    }

    #[test]
    fn layout() {
        let slide = Slide {
            title: Some("Title".into()),
            properties: vec![SlideProperty::new("class", "center")],
            body: vec![ContentBlock::prose("hi"), ContentBlock::Fragment, ContentBlock::code(Some("scala"), "val x = 1\n")],
            notes: Some("notes".into()),
        };
        let deck = Deck::new(vec![slide, Slide { title: Some("Bye".into()), ..Default::default() }]).expect("invalid deck");
        let expected = "class: center

# Title

hi

--

```scala
val x = 1
```

???
notes
---
# Bye
";
        assert_eq!(DeckSerializer.serialize(&deck), expected);
    }

    #[rstest]
    #[case::plain("x\n", "```\nx\n```")]
    #[case::no_trailing_newline("x", "```\nx\n```")]
    #[case::inner_fence("```\n", "````\n```\n````")]
    #[case::inner_long_fence("`````\n", "``````\n`````\n``````")]
    #[case::inner_indented_fence("  ```\n", "````\n  ```\n````")]
    fn snippets(#[case] code: &str, #[case] expected: &str) {
        let snippet = CodeSnippet { language: None, code: code.into() };
        assert_eq!(DeckSerializer::serialize_snippet(&snippet), expected);
    }

    #[test]
    fn round_trip_constructed() {
        let slides = vec![
            Slide {
                title: Some("Scala conventions".into()),
                properties: vec![SlideProperty::new("class", "center, middle"), SlideProperty::new("name", "title")],
                ..Default::default()
            },
            Slide {
                title: Some("Avoid return".into()),
                body: vec![
                    ContentBlock::prose("`return` in a lambda\n\nthrows **NonLocalReturnControl**."),
                    ContentBlock::code(Some("scala"), "def f = list.foreach { x =>\n  return x\n}\n"),
                    ContentBlock::Fragment,
                    ContentBlock::code(Some("scala"), "def f = list.headOption\n"),
                    ContentBlock::code(None, "---\n--\n???\n```\n"),
                ],
                notes: Some("Mention the stack trace.\n\nAnd the cost.".into()),
                ..Default::default()
            },
            Slide::default(),
            Slide { title: Some("Thanks".into()), notes: Some("questions".into()), ..Default::default() },
        ];
        let deck = Deck::new(slides).expect("invalid deck");
        assert_eq!(round_trip(&deck), deck);
    }

    #[test]
    fn round_trip_parsed() {
        let input = "name: intro
# Hi
text
--
more text
```scala
val x = 1
```
???
notes
---
---
plain";
        let deck = DeckParser.parse(input).expect("parsing failed");
        assert_eq!(round_trip(&deck), deck);
    }

    #[test]
    fn round_trip_fences() {
        let input = "# Fences
* a list item

   ```scala
   ---
   ```
~~~scala
  ```
~~~
???
```yaml
---
key: value
```
---
```not inline``` code";
        let deck = DeckParser.parse(input).expect("parsing failed");
        assert_eq!(deck.len(), 2);
        assert_eq!(round_trip(&deck), deck);
    }

    #[test]
    fn round_trip_bundled_deck() {
        let deck = crate::bundled::scala_conventions().expect("bundled deck is invalid");
        assert_eq!(round_trip(&deck), deck);
    }
}
