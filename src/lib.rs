//! # mdrtf
//!
//! Convert Markdown to RTF: headings, emphasis, lists, quotes, code blocks,
//! pipe tables and inline `#RRGGBB ` color markers.
//!
//! ```
//! let rtf = mdrtf::markdown_to_rtf("# Title\n\n#FF0000 Warning").unwrap();
//! assert!(rtf.starts_with("{\\rtf1"));
//! assert!(rtf.contains("\\cf1 Warning\\cf0 "));
//! ```

mod block;
mod color;
mod config;
mod error;
mod escape;
mod parser;
mod rtf;
mod width;

pub use block::{Block, Inline, List, ListItem, Table, TableCell, TableRow};
pub use color::{ColorTable, Rgb};
pub use config::{ColorsConfig, Config, FontConfig};
pub use error::{Error, Result};
pub use escape::{encode_surrogate_units, encode_surrogates, escape_rtf};
pub use width::{display_width, utf16_display_width};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Render an already-parsed tree. `source` is scanned for color markers.
pub fn render(source: &str, blocks: &[Block], config: &Config) -> Result<String> {
    rtf::render(source, blocks, config)
}

/// Convert markdown to RTF.
///
/// `base_half_points` is the body font size in half-points (20 = 10pt);
/// `default_color` replaces black as color index 0.
pub fn convert(
    markdown: &str,
    base_half_points: u32,
    default_color: Option<Rgb>,
) -> Result<String> {
    let mut config = Config::compiled_default();
    config.font.base_size = base_half_points;
    config.colors.default = default_color.map(|c| c.to_string());
    convert_with_config(markdown, &config)
}

/// Convert markdown to RTF using default config.
pub fn markdown_to_rtf(markdown: &str) -> Result<String> {
    convert_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to RTF with custom config.
pub fn convert_with_config(markdown: &str, config: &Config) -> Result<String> {
    let blocks = parse(markdown);
    render(markdown, &blocks, config)
}
