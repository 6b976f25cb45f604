use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, Inline, List, ListItem, Table, TableCell, TableRow};

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options).into_offset_iter();
    let mut blocks = Vec::new();
    let mut state = ParseState::new(markdown);

    for (event, range) in parser {
        process_event(event, range, &mut state, &mut blocks);
    }

    blocks
}

struct ParseState<'a> {
    source: &'a str,

    // Current inline content being built
    spans: Vec<Inline>,
    // Open emphasis/link spans with the content that preceded them
    span_stack: Vec<(OpenSpan, Vec<Inline>)>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_content: String,

    // Raw HTML block state
    in_html_block: bool,
    html_content: String,

    // Image alt text is dropped
    image_depth: usize,

    // Open containers, innermost last
    frames: Vec<Frame>,
}

enum OpenSpan {
    Emphasis { delimiter: char, count: u8 },
    Link { url: String, title: String },
}

enum Frame {
    Quote { blocks: Vec<Block> },
    List { ordered: bool, start: u64, items: Vec<ListItem> },
    Item { ordinal: u64, blocks: Vec<Block> },
    Table { rows: Vec<TableRow> },
    Row { cells: Vec<TableCell> },
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            spans: Vec::new(),
            span_stack: Vec::new(),
            heading_level: None,
            in_code_block: false,
            code_content: String::new(),
            in_html_block: false,
            html_content: String::new(),
            image_depth: 0,
            frames: Vec::new(),
        }
    }

    /// Delimiter character at the start of an emphasis range.
    fn delimiter_at(&self, range: &Range<usize>) -> char {
        match self.source[range.start..].chars().next() {
            Some(c @ ('*' | '_')) => c,
            _ => '*',
        }
    }

    /// Number written before an ordered list item marker, if any.
    fn ordinal_at(&self, range: &Range<usize>) -> Option<u64> {
        let text = self.source[range.start..].trim_start();
        let digits = text
            .find(|c: char| !c.is_ascii_digit())
            .map_or(text, |end| &text[..end]);
        digits.parse().ok()
    }

    fn push_literal(&mut self, text: &str) {
        // Adjacent text events are one literal run
        if let Some(Inline::Literal(last)) = self.spans.last_mut() {
            last.push_str(text);
        } else {
            self.spans.push(Inline::Literal(text.to_string()));
        }
    }

    /// Tight list items carry text without a paragraph; wrap it in one.
    fn flush_item_spans(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        if let Some(Frame::Item { blocks, .. }) = self.frames.last_mut() {
            let content = std::mem::take(&mut self.spans);
            blocks.push(Block::Paragraph { content });
        }
    }
}

fn push_block(block: Block, state: &mut ParseState, blocks: &mut Vec<Block>) {
    match state.frames.last_mut() {
        Some(Frame::Quote { blocks: inner } | Frame::Item { blocks: inner, .. }) => {
            inner.push(block);
        }
        _ => blocks.push(block),
    }
}

fn process_event(
    event: Event,
    range: Range<usize>,
    state: &mut ParseState,
    blocks: &mut Vec<Block>,
) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.flush_item_spans();
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.spans);
                push_block(Block::Heading { level, content }, state, blocks);
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {
            state.flush_item_spans();
        }
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if !content.is_empty() {
                push_block(Block::Paragraph { content }, state, blocks);
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else if state.image_depth == 0 {
                state.push_literal(&text);
            }
        }

        // Inline code
        Event::Code(code) => {
            state.spans.push(Inline::CodeSpan(code.into_string()));
        }

        Event::InlineHtml(html) => {
            state.spans.push(Inline::RawMarkup(html.into_string()));
        }
        Event::Html(html) => {
            if state.in_html_block {
                state.html_content.push_str(&html);
            }
        }
        Event::Start(Tag::HtmlBlock) => {
            state.in_html_block = true;
            state.html_content.clear();
        }
        Event::End(TagEnd::HtmlBlock) => {
            state.in_html_block = false;
            let raw = std::mem::take(&mut state.html_content);
            push_block(Block::Html(raw), state, blocks);
        }

        // Bold and italic keep the delimiter they were written with
        Event::Start(Tag::Emphasis) => {
            let delimiter = state.delimiter_at(&range);
            let parent = std::mem::take(&mut state.spans);
            state
                .span_stack
                .push((OpenSpan::Emphasis { delimiter, count: 1 }, parent));
        }
        Event::Start(Tag::Strong) => {
            let delimiter = state.delimiter_at(&range);
            let parent = std::mem::take(&mut state.spans);
            state
                .span_stack
                .push((OpenSpan::Emphasis { delimiter, count: 2 }, parent));
        }
        Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Link) => {
            let children = std::mem::take(&mut state.spans);
            if let Some((open, mut parent)) = state.span_stack.pop() {
                parent.push(close_span(open, children));
                state.spans = parent;
            }
        }

        // Links
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) => {
            let parent = std::mem::take(&mut state.spans);
            state.span_stack.push((
                OpenSpan::Link {
                    url: dest_url.into_string(),
                    title: title.into_string(),
                },
                parent,
            ));
        }

        // Images are not rendered
        Event::Start(Tag::Image { .. }) => {
            state.image_depth += 1;
        }
        Event::End(TagEnd::Image) => {
            state.image_depth = state.image_depth.saturating_sub(1);
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(_)) => {
            state.flush_item_spans();
            state.in_code_block = true;
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            push_block(
                Block::FencedCode {
                    lines: split_code_lines(&content),
                },
                state,
                blocks,
            );
        }

        // Quotes
        Event::Start(Tag::BlockQuote(_)) => {
            state.flush_item_spans();
            state.frames.push(Frame::Quote { blocks: Vec::new() });
        }
        Event::End(TagEnd::BlockQuote(_)) => {
            if let Some(Frame::Quote { blocks: inner }) = state.frames.pop() {
                push_block(Block::Quote(inner), state, blocks);
            }
        }

        // Lists
        Event::Start(Tag::List(first_number)) => {
            state.flush_item_spans();
            state.frames.push(Frame::List {
                ordered: first_number.is_some(),
                start: first_number.unwrap_or(1),
                items: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(Frame::List { ordered, items, .. }) = state.frames.pop() {
                push_block(Block::List(List { ordered, items }), state, blocks);
            }
        }

        Event::Start(Tag::Item) => {
            let ordinal = match state.frames.last() {
                Some(Frame::List {
                    ordered: true,
                    start,
                    items,
                }) => state
                    .ordinal_at(&range)
                    .unwrap_or(*start + items.len() as u64),
                _ => 0,
            };
            state.frames.push(Frame::Item {
                ordinal,
                blocks: Vec::new(),
            });
        }
        Event::End(TagEnd::Item) => {
            state.flush_item_spans();
            if let Some(Frame::Item { ordinal, blocks: inner }) = state.frames.pop() {
                if let Some(Frame::List { items, .. }) = state.frames.last_mut() {
                    items.push(ListItem {
                        ordinal,
                        blocks: inner,
                    });
                }
            }
        }

        // Tables
        Event::Start(Tag::Table(_)) => {
            state.flush_item_spans();
            state.frames.push(Frame::Table { rows: Vec::new() });
        }
        Event::End(TagEnd::Table) => {
            if let Some(Frame::Table { rows }) = state.frames.pop() {
                push_block(Block::Table(Table { rows }), state, blocks);
            }
        }

        Event::Start(Tag::TableHead | Tag::TableRow) => {
            state.frames.push(Frame::Row { cells: Vec::new() });
        }
        Event::End(TagEnd::TableHead | TagEnd::TableRow) => {
            if let Some(Frame::Row { cells }) = state.frames.pop() {
                if let Some(Frame::Table { rows }) = state.frames.last_mut() {
                    rows.push(TableRow { cells });
                }
            }
        }

        Event::Start(Tag::TableCell) => {
            state.spans.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let content = std::mem::take(&mut state.spans);
            let cell = if content.is_empty() {
                TableCell::default()
            } else {
                TableCell {
                    blocks: vec![Block::Paragraph { content }],
                }
            };
            if let Some(Frame::Row { cells }) = state.frames.last_mut() {
                cells.push(cell);
            }
        }

        // Horizontal rule
        Event::Rule => {
            state.flush_item_spans();
            push_block(Block::ThematicBreak, state, blocks);
        }

        // Soft and hard breaks both become explicit line breaks
        Event::SoftBreak | Event::HardBreak => {
            if state.image_depth == 0 {
                state.spans.push(Inline::LineBreak);
            }
        }

        // Ignore other events
        _ => {}
    }
}

fn close_span(open: OpenSpan, children: Vec<Inline>) -> Inline {
    match open {
        OpenSpan::Emphasis { delimiter, count } => Inline::Emphasis {
            delimiter,
            count,
            children,
        },
        OpenSpan::Link { url, title } => {
            let label = plain_text(&children);
            let title = if !label.is_empty() {
                Some(label)
            } else if !title.is_empty() {
                Some(title)
            } else {
                None
            };
            Inline::Link { url, title }
        }
    }
}

/// Visible text of a span list, styling dropped
fn plain_text(spans: &[Inline]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Inline::Literal(text) | Inline::CodeSpan(text) | Inline::RawMarkup(text) => {
                out.push_str(text);
            }
            Inline::Emphasis { children, .. } => out.push_str(&plain_text(children)),
            Inline::Link { url, title } => out.push_str(title.as_deref().unwrap_or(url)),
            Inline::LineBreak => out.push(' '),
        }
    }
    out
}

fn split_code_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    body.split('\n').map(str::to_string).collect()
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
