//! Block tree → RTF.
//!
//! All mutable state for one conversion lives in a [`RenderContext`] created
//! by [`render`] and dropped when it returns, so concurrent conversions never
//! share anything.

mod inline;
mod list;
mod table;

pub(crate) use inline::InlineWriter;

use crate::block::{Block, Inline};
use crate::color::ColorTable;
use crate::config::{Config, FontConfig};
use crate::error::Result;
use crate::escape::{encode_surrogates, push_escaped};

/// Relative heading sizes in half-points at a base size of 20, H1 first
const HEADING_SIZES: [u32; 6] = [30, 28, 26, 24, 22, 20];

const PAR: &str = "\\par\n";

/// Render `blocks` (parsed from `source`) to a complete RTF document.
pub fn render(source: &str, blocks: &[Block], config: &Config) -> Result<String> {
    let colors = ColorTable::build(source, config.colors.default_color()?);
    let mut ctx = RenderContext::new(config.font.base_size, &colors);

    ctx.write_header(&config.font);
    colors.write_rtf(&mut ctx.out, config.colors.collapse_duplicates);
    ctx.out.push_str("\\cf0\n");

    for block in blocks {
        ctx.block(block);
    }
    ctx.out.push_str("}\n");

    tracing::debug!(blocks = blocks.len(), bytes = ctx.out.len(), "rendered document");
    encode_surrogates(&ctx.out)
}

/// Nesting state for list rendering.
#[derive(Debug, Clone, Copy)]
struct ListState {
    /// -1 outside any list
    depth: i32,
    /// A paragraph break is owed before the next list item starts
    pending_break: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            depth: -1,
            pending_break: false,
        }
    }
}

struct RenderContext<'a> {
    out: String,
    base_size: u32,
    colors: &'a ColorTable,
    list: ListState,
}

impl<'a> RenderContext<'a> {
    fn new(base_size: u32, colors: &'a ColorTable) -> Self {
        Self {
            out: String::new(),
            base_size,
            colors,
            list: ListState::default(),
        }
    }

    fn write_header(&mut self, fonts: &FontConfig) {
        self.out.push_str("{\\rtf1\\ansi\\deff0\n");
        self.out.push_str("{\\fonttbl{\\f0 ");
        push_escaped(&mut self.out, &fonts.body);
        self.out.push_str(";}{\\f1\\fmodern ");
        push_escaped(&mut self.out, &fonts.mono);
        self.out.push_str(";}}\n");
    }

    fn inlines(&mut self, spans: &[Inline]) {
        InlineWriter::new(self.colors).write_all(spans, &mut self.out, None);
    }

    /// Dispatch one block to its renderer. Unsupported blocks emit nothing.
    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => self.heading(*level, content),
            Block::Paragraph { content } => self.paragraph(content),
            Block::List(list) => self.list(list),
            Block::ThematicBreak => {
                self.out.push_str("\\pard\\brdrb\\brdrs\\brdrw10\\brsp20\\par\n");
            }
            Block::Quote(blocks) => self.quote(blocks),
            Block::FencedCode { lines } => self.code(lines),
            Block::Table(table) => self.table(table),
            Block::Html(_) => {
                tracing::trace!("skipping raw HTML block");
            }
        }
    }

    /// `base_size * numerator / denominator`, widened so large bases can't overflow.
    fn scaled_size(&self, numerator: u32, denominator: u32) -> u64 {
        u64::from(self.base_size) * u64::from(numerator) / u64::from(denominator)
    }

    fn heading(&mut self, level: u8, content: &[Inline]) {
        let level = level.clamp(1, 6);
        let size = self.scaled_size(HEADING_SIZES[usize::from(level - 1)], 20);
        self.out.push_str(&format!("\\pard\\sa180\\fs{size} \\b "));
        self.inlines(content);
        self.out.push_str("\\b0\\par\n");
    }

    fn paragraph(&mut self, content: &[Inline]) {
        self.out
            .push_str(&format!("\\pard\\sa180\\fs{} ", self.base_size));
        self.inlines(content);
        self.out.push_str(PAR);
    }

    fn code(&mut self, lines: &[String]) {
        self.out
            .push_str(&format!("\\pard\\sa0\\fs{} ", self.scaled_size(9, 10)));
        for line in lines {
            push_escaped(&mut self.out, line);
            self.out.push_str("\\line\n");
        }
        self.out.push_str(PAR);
    }

    fn quote(&mut self, blocks: &[Block]) {
        for block in blocks {
            if let Block::Paragraph { content } = block {
                self.out
                    .push_str(&format!("\\pard\\li300\\sa180\\fs{} ", self.base_size));
                self.inlines(content);
                self.out.push_str(PAR);
            } else {
                self.block(block);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{convert, markdown_to_rtf};

    const HEADER: &str = "{\\rtf1\\ansi\\deff0\n{\\fonttbl{\\f0 Arial;}{\\f1\\fmodern Courier New;}}\n{\\colortbl\n\\red0\\green0\\blue0;\n}\n\\cf0\n";

    fn body(markdown: &str) -> String {
        let rtf = markdown_to_rtf(markdown).unwrap();
        rtf.strip_prefix(HEADER)
            .and_then(|rest| rest.strip_suffix("}\n"))
            .unwrap_or_else(|| panic!("unexpected frame: {rtf}"))
            .to_string()
    }

    #[test]
    fn empty_document() {
        assert_eq!(markdown_to_rtf("").unwrap(), format!("{HEADER}}}\n"));
    }

    #[test]
    fn heading() {
        assert_eq!(body("# Hello"), "\\pard\\sa180\\fs30 \\b Hello\\b0\\par\n");
        assert_eq!(body("###### Six"), "\\pard\\sa180\\fs20 \\b Six\\b0\\par\n");
    }

    #[test]
    fn heading_scales_with_base_size() {
        let rtf = convert("# Big", 24, None).unwrap();
        assert!(rtf.contains("\\pard\\sa180\\fs36 \\b Big\\b0\\par\n"));
    }

    #[test]
    fn large_base_size_does_not_overflow() {
        let rtf = convert("# Big\n\n```\nx\n```", 200_000_000, None).unwrap();
        assert!(rtf.contains("\\pard\\sa180\\fs300000000 \\b Big\\b0\\par\n"));
        assert!(rtf.contains("\\pard\\sa0\\fs180000000 x\\line\n"));

        let rtf = convert("# Max", u32::MAX, None).unwrap();
        assert!(rtf.contains("\\fs6442450942 \\b Max"));
    }

    #[test]
    fn paragraph() {
        assert_eq!(body("Hello world"), "\\pard\\sa180\\fs20 Hello world\\par\n");
    }

    #[test]
    fn emphasis_toggles() {
        assert_eq!(
            body("*i* **b** __u__"),
            "\\pard\\sa180\\fs20 \\i i\\i0  \\b b\\b0  \\ul u\\ulnone \\par\n"
        );
    }

    #[test]
    fn triple_emphasis_closes_in_reverse() {
        assert_eq!(
            body("***both***"),
            "\\pard\\sa180\\fs20 \\i \\b both\\b0 \\i0 \\par\n"
        );
    }

    #[test]
    fn hard_break() {
        assert_eq!(
            body("line one  \nline two"),
            "\\pard\\sa180\\fs20 line one\\line line two\\par\n"
        );
    }

    #[test]
    fn inline_code() {
        assert_eq!(
            body("run `a{b}`"),
            "\\pard\\sa180\\fs20 run \\f1 a\\{b\\}\\f0 \\par\n"
        );
    }

    #[test]
    fn link_shows_text_not_url() {
        assert_eq!(
            body("[docs](https://example.com)"),
            "\\pard\\sa180\\fs20 \\ul docs\\ulnone \\par\n"
        );
    }

    #[test]
    fn inline_html_is_escaped_text() {
        assert_eq!(
            body("a <span>b</span>"),
            "\\pard\\sa180\\fs20 a <span>b</span>\\par\n"
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(body("a {b}"), "\\pard\\sa180\\fs20 a \\{b\\}\\par\n");
    }

    #[test]
    fn code_block() {
        assert_eq!(
            body("```rust\nlet x = {1};\n# not a heading\n```"),
            "\\pard\\sa0\\fs18 let x = \\{1\\};\\line\n# not a heading\\line\n\\par\n"
        );
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(body("---"), "\\pard\\brdrb\\brdrs\\brdrw10\\brsp20\\par\n");
    }

    #[test]
    fn quote() {
        assert_eq!(
            body("> quoted\n>\n> ---"),
            "\\pard\\li300\\sa180\\fs20 quoted\\par\n\\pard\\brdrb\\brdrs\\brdrw10\\brsp20\\par\n"
        );
    }

    #[test]
    fn html_block_is_skipped() {
        assert_eq!(body("<div>\nhidden\n</div>"), "");
    }

    #[test]
    fn colored_text() {
        let rtf = markdown_to_rtf("#FF0000 red text").unwrap();
        assert!(rtf.contains("\\red255\\green0\\blue0;\n"));
        assert!(rtf.contains("\\pard\\sa180\\fs20 \\cf1 red text\\cf0 \\par\n"));
    }

    #[test]
    fn emoji_is_escaped() {
        assert_eq!(
            body("hi \u{1F600}"),
            "\\pard\\sa180\\fs20 hi \\u-10179?\\u-8704?\\par\n"
        );
    }
}
