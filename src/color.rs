//! Color table built from inline `#RRGGBB ` markers.
//!
//! The raw Markdown source is scanned once before rendering. Every distinct
//! marker string gets an entry in the marker lookup; markers naming the same
//! RGB value share one slot in the color list.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

/// `#` + six hex digits + exactly one whitespace character
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Fa-f]{6}\s").unwrap());

/// Same pattern anchored at the start of a text run
static LEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}\s").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Marker key this color is registered under, e.g. `"#FF0000 "`.
    fn marker(self) -> String {
        format!("{self} ")
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#RRGGBB` or `RRGGBB`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Split a leading color marker off a text run.
///
/// Returns the marker (with its trailing whitespace) and the rest of the run.
pub fn split_leading_marker(text: &str) -> Option<(&str, &str)> {
    LEADING_MARKER_RE
        .find(text)
        .map(|m| (m.as_str(), &text[m.end()..]))
}

#[derive(Debug, Clone)]
pub struct ColorTable {
    colors: Vec<Rgb>,
    /// Marker keys in first-seen order, with their color index
    entries: Vec<(String, usize)>,
    lookup: HashMap<String, usize>,
}

impl ColorTable {
    /// Scan `source` for color markers. Index 0 is `default` (black if none).
    pub fn build(source: &str, default: Option<Rgb>) -> Self {
        let default = default.unwrap_or(Rgb::BLACK);
        let mut table = Self {
            colors: vec![default],
            entries: Vec::new(),
            lookup: HashMap::new(),
        };
        table.register(default.marker(), default);

        for m in MARKER_RE.find_iter(source) {
            let marker = m.as_str();
            if table.lookup.contains_key(marker) {
                continue;
            }
            // The regex guarantees the hex digits
            let Ok(color) = marker[..7].parse::<Rgb>() else {
                continue;
            };
            table.register(marker.to_string(), color);
        }

        tracing::debug!(
            colors = table.colors.len(),
            markers = table.entries.len(),
            "built color table"
        );
        table
    }

    fn register(&mut self, marker: String, color: Rgb) {
        let index = match self.colors.iter().position(|c| *c == color) {
            Some(index) => index,
            None => {
                self.colors.push(color);
                self.colors.len() - 1
            }
        };
        self.lookup.insert(marker.clone(), index);
        self.entries.push((marker, index));
    }

    /// Distinct colors; index 0 is the default font color.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color index registered for `marker`, if the pre-scan saw it.
    pub fn index_of(&self, marker: &str) -> Option<usize> {
        self.lookup.get(marker).copied()
    }

    /// Number of registered marker keys (including the default's).
    pub fn marker_count(&self) -> usize {
        self.entries.len()
    }

    /// Emit the `{\colortbl ...}` group.
    ///
    /// By default one line is written per marker key, so two keys naming the
    /// same color each produce a line. `collapse_duplicates` writes one line
    /// per distinct color instead.
    pub fn write_rtf(&self, out: &mut String, collapse_duplicates: bool) {
        out.push_str("{\\colortbl\n");
        if collapse_duplicates {
            for color in &self.colors {
                push_color_line(out, *color);
            }
        } else {
            for (_, index) in &self.entries {
                push_color_line(out, self.colors[*index]);
            }
        }
        out.push_str("}\n");
    }
}

fn push_color_line(out: &mut String, c: Rgb) {
    out.push_str(&format!("\\red{}\\green{}\\blue{};\n", c.r, c.g, c.b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rgb() {
        assert_eq!("#FF8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
        assert!("#FFF".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_uppercase_hex() {
        assert_eq!(Rgb::new(26, 79, 139).to_string(), "#1A4F8B");
    }

    #[test]
    fn repeated_markers_share_an_index() {
        let table = ColorTable::build("#FF0000 a #FF0000 b #00FF00 c", None);
        assert_eq!(table.colors().len(), 3);
        assert_eq!(table.index_of("#FF0000 "), Some(1));
        assert_eq!(table.index_of("#00FF00 "), Some(2));
    }

    #[test]
    fn distinct_keys_same_color_reuse_slot() {
        let table = ColorTable::build("#ff0000 a #FF0000 b", None);
        assert_eq!(table.colors().len(), 2);
        assert_eq!(table.index_of("#ff0000 "), Some(1));
        assert_eq!(table.index_of("#FF0000 "), Some(1));
        assert_eq!(table.marker_count(), 3);
    }

    #[test]
    fn marker_needs_trailing_whitespace() {
        let table = ColorTable::build("#FF0000", None);
        assert_eq!(table.colors(), &[Rgb::BLACK]);
    }

    #[test]
    fn default_override_is_index_zero() {
        let blue = Rgb::new(0, 0, 255);
        let table = ColorTable::build("#0000FF x", Some(blue));
        assert_eq!(table.colors(), &[blue]);
        assert_eq!(table.index_of("#0000FF "), Some(0));
    }

    #[test]
    fn write_one_line_per_marker_key() {
        let table = ColorTable::build("#ff0000 a #FF0000 b", None);
        let mut out = String::new();
        table.write_rtf(&mut out, false);
        assert_eq!(
            out,
            "{\\colortbl\n\\red0\\green0\\blue0;\n\\red255\\green0\\blue0;\n\\red255\\green0\\blue0;\n}\n"
        );
    }

    #[test]
    fn write_collapsed() {
        let table = ColorTable::build("#ff0000 a #FF0000 b", None);
        let mut out = String::new();
        table.write_rtf(&mut out, true);
        assert_eq!(
            out,
            "{\\colortbl\n\\red0\\green0\\blue0;\n\\red255\\green0\\blue0;\n}\n"
        );
    }

    #[test]
    fn split_marker() {
        assert_eq!(
            split_leading_marker("#00FF00 green"),
            Some(("#00FF00 ", "green"))
        );
        assert_eq!(split_leading_marker("say #00FF00 green"), None);
    }
}
