use super::elements::{ListItem, ListItemType, ProseElement, StyledText, Text, TextStyle};
use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};
use std::mem;

/// Parses the markdown in a prose block into elements that can be drawn.
///
/// Prose is written by the deck's author so this never fails: anything that isn't understood is
/// turned into its plain text.
#[derive(Default)]
pub struct ProseParser;

impl ProseParser {
    pub fn parse(&self, contents: &str) -> Vec<ProseElement> {
        let arena = Arena::new();
        let mut options = Options::default();
        options.extension.strikethrough = true;
        let root = parse_document(&arena, contents, &options);
        let mut elements = Vec::new();
        for node in root.children() {
            elements.extend(Self::parse_node(node));
        }
        elements
    }

    fn parse_node<'a>(node: &'a AstNode<'a>) -> Option<ProseElement> {
        let data = node.data.borrow();
        let element = match &data.value {
            NodeValue::Paragraph => ProseElement::Paragraph(InlinesParser::default().parse(node)),
            NodeValue::Heading(heading) => {
                let text = InlinesParser::default().parse(node).into_iter().next().unwrap_or_default();
                ProseElement::Heading { level: heading.level, text }
            }
            NodeValue::List(_) => ProseElement::List(Self::parse_list(node, 0)),
            NodeValue::BlockQuote => {
                let mut lines = Vec::new();
                for child in node.children() {
                    lines.extend(InlinesParser::default().parse(child));
                }
                ProseElement::BlockQuote(lines)
            }
            NodeValue::CodeBlock(block) => ProseElement::Preformatted(block.literal.to_string()),
            NodeValue::HtmlBlock(block) => {
                let html = block.literal.trim();
                if html.starts_with("<!--") {
                    return None;
                }
                ProseElement::Preformatted(html.to_string())
            }
            NodeValue::ThematicBreak => ProseElement::Rule,
            _ => ProseElement::Paragraph(InlinesParser::default().parse(node)),
        };
        Some(element)
    }

    fn parse_list<'a>(root: &'a AstNode<'a>, depth: u8) -> Vec<ListItem> {
        let start = match &root.data.borrow().value {
            NodeValue::List(list) => list.start,
            _ => 1,
        };
        let mut items = Vec::new();
        for (index, node) in root.children().enumerate() {
            let data = node.data.borrow();
            let NodeValue::Item(item) = &data.value else {
                continue;
            };
            let item_type = match item.list_type {
                ListType::Bullet => ListItemType::Unordered,
                ListType::Ordered => ListItemType::Ordered(start + index),
            };
            for child in node.children() {
                let is_list = matches!(child.data.borrow().value, NodeValue::List(_));
                if is_list {
                    items.extend(Self::parse_list(child, depth + 1));
                    continue;
                }
                for contents in InlinesParser::default().parse(child) {
                    items.push(ListItem { depth, contents, item_type: item_type.clone() });
                }
            }
        }
        items
    }
}

#[derive(Default)]
struct InlinesParser {
    lines: Vec<Text>,
    chunks: Vec<StyledText>,
}

impl InlinesParser {
    fn parse<'a>(mut self, node: &'a AstNode<'a>) -> Vec<Text> {
        self.collect_children(node, TextStyle::default());
        self.store_pending_line();
        self.lines
    }

    fn store_pending_line(&mut self) {
        let chunks = mem::take(&mut self.chunks);
        if !chunks.is_empty() {
            self.lines.push(Text { chunks });
        }
    }

    fn collect_children<'a>(&mut self, node: &'a AstNode<'a>, style: TextStyle) {
        for child in node.children() {
            self.collect(child, style);
        }
    }

    fn collect<'a>(&mut self, node: &'a AstNode<'a>, style: TextStyle) {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(text) => self.chunks.push(StyledText::styled(text.to_string(), style)),
            NodeValue::Code(code) => self.chunks.push(StyledText::styled(code.literal.to_string(), style.code())),
            NodeValue::HtmlInline(html) => self.chunks.push(StyledText::styled(html.to_string(), style)),
            NodeValue::Strong => self.collect_children(node, style.bold()),
            NodeValue::Emph => self.collect_children(node, style.italics()),
            NodeValue::Strikethrough => self.collect_children(node, style.strikethrough()),
            NodeValue::Link(_) => self.collect_children(node, style.link()),
            NodeValue::SoftBreak => self.chunks.push(StyledText::styled(" ", style)),
            NodeValue::LineBreak => self.store_pending_line(),
            NodeValue::CodeBlock(block) => {
                for line in block.literal.lines() {
                    self.chunks.push(StyledText::styled(line.to_string(), style.code()));
                    self.store_pending_line();
                }
            }
            _ => self.collect_children(node, style),
        }
    }
}
