/// Inline spans within a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// `*a*`, `**a**`, `_a_`, `__a__`. Triple delimiters arrive as two nested spans.
    Emphasis {
        delimiter: char,
        count: u8,
        children: Vec<Inline>,
    },
    LineBreak,
    CodeSpan(String),
    /// Inline HTML, passed through as text
    RawMarkup(String),
    /// `title` is the text shown for the link; when absent the URL is shown instead.
    Link { url: String, title: Option<String> },
    Literal(String),
}

/// A single list item with its own stored ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Number as written in the source (`5.` gives 5); 0 for bullet items
    pub ordinal: u64,
    pub blocks: Vec<Block>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

impl TableCell {
    /// Inline content of every paragraph in the cell, in order.
    pub fn inlines(&self) -> impl Iterator<Item = &Inline> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Paragraph { content } => content.as_slice(),
            _ => &[][..],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Pipe table. The header row is the first entry of `rows`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    List(List),
    ThematicBreak,
    Quote(Vec<Block>),
    /// Fenced or indented code, one entry per source line
    FencedCode { lines: Vec<String> },
    Table(Table),
    /// Raw HTML block; never rendered
    Html(String),
}
