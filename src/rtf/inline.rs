use crate::block::Inline;
use crate::color::{ColorTable, split_leading_marker};
use crate::escape::push_escaped;

/// Renders inline spans into a caller-supplied buffer.
///
/// When a plain-text accumulator is passed, the visible text of every span
/// is appended to it as well; table layout measures cell widths from it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InlineWriter<'a> {
    colors: &'a ColorTable,
    suppress_line_breaks: bool,
}

impl<'a> InlineWriter<'a> {
    pub(crate) fn new(colors: &'a ColorTable) -> Self {
        Self {
            colors,
            suppress_line_breaks: false,
        }
    }

    /// Drop `\line` for line breaks, e.g. inside table rows.
    pub(crate) fn suppress_line_breaks(mut self, suppress: bool) -> Self {
        self.suppress_line_breaks = suppress;
        self
    }

    pub(crate) fn write_all(
        &self,
        spans: &[Inline],
        out: &mut String,
        mut plain: Option<&mut String>,
    ) {
        for span in spans {
            self.write(span, out, plain.as_deref_mut());
        }
    }

    pub(crate) fn write(&self, span: &Inline, out: &mut String, mut plain: Option<&mut String>) {
        match span {
            Inline::Emphasis {
                delimiter,
                count,
                children,
            } => {
                let toggle = emphasis_toggle(*delimiter, *count);
                if let Some((on, _)) = toggle {
                    out.push_str(on);
                }
                self.write_all(children, out, plain);
                if let Some((_, off)) = toggle {
                    out.push_str(off);
                }
            }
            Inline::LineBreak => {
                if !self.suppress_line_breaks {
                    out.push_str("\\line ");
                }
            }
            Inline::CodeSpan(text) => {
                if let Some(plain) = plain.as_deref_mut() {
                    plain.push_str(text);
                }
                out.push_str("\\f1 ");
                push_escaped(out, text);
                out.push_str("\\f0 ");
            }
            Inline::RawMarkup(tag) => {
                if let Some(plain) = plain.as_deref_mut() {
                    plain.push_str(tag);
                }
                push_escaped(out, tag);
            }
            Inline::Link { url, title } => {
                let shown = title.as_deref().unwrap_or(url);
                if let Some(plain) = plain.as_deref_mut() {
                    plain.push_str(shown);
                }
                out.push_str("\\ul ");
                push_escaped(out, shown);
                out.push_str("\\ulnone ");
            }
            Inline::Literal(text) => self.literal(text, out, plain),
        }
    }

    fn literal(&self, text: &str, out: &mut String, plain: Option<&mut String>) {
        let Some((marker, rest)) = split_leading_marker(text) else {
            if let Some(plain) = plain {
                plain.push_str(text);
            }
            push_escaped(out, text);
            return;
        };

        if let Some(plain) = plain {
            plain.push_str(rest);
        }
        let index = self.colors.index_of(marker).unwrap_or_else(|| {
            tracing::warn!(marker = marker.trim_end(), "color marker missing from color table");
            0
        });
        out.push_str(&format!("\\cf{index} "));
        push_escaped(out, rest);
        out.push_str("\\cf0 ");
    }
}

/// On/off control words for an emphasis span: `*a*` and `_a_` italic,
/// `**a**` bold, `__a__` underline.
fn emphasis_toggle(delimiter: char, count: u8) -> Option<(&'static str, &'static str)> {
    match (delimiter, count) {
        ('*' | '_', 1) => Some(("\\i ", "\\i0 ")),
        ('*', 2) => Some(("\\b ", "\\b0 ")),
        ('_', 2) => Some(("\\ul ", "\\ulnone ")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Inline {
        Inline::Literal(text.to_string())
    }

    fn render(spans: &[Inline], colors: &ColorTable) -> (String, String) {
        let mut out = String::new();
        let mut plain = String::new();
        InlineWriter::new(colors).write_all(spans, &mut out, Some(&mut plain));
        (out, plain)
    }

    #[test]
    fn plain_text_skips_styling() {
        let colors = ColorTable::build("", None);
        let spans = vec![
            Inline::Emphasis {
                delimiter: '*',
                count: 2,
                children: vec![lit("bold")],
            },
            lit(" and "),
            Inline::CodeSpan("code".to_string()),
        ];
        let (out, plain) = render(&spans, &colors);
        assert_eq!(out, "\\b bold\\b0  and \\f1 code\\f0 ");
        assert_eq!(plain, "bold and code");
    }

    #[test]
    fn unknown_emphasis_renders_children_only() {
        let colors = ColorTable::build("", None);
        let spans = vec![Inline::Emphasis {
            delimiter: '~',
            count: 2,
            children: vec![lit("x")],
        }];
        assert_eq!(render(&spans, &colors).0, "x");
    }

    #[test]
    fn link_without_title_shows_url() {
        let colors = ColorTable::build("", None);
        let spans = vec![Inline::Link {
            url: "https://example.com".to_string(),
            title: None,
        }];
        assert_eq!(
            render(&spans, &colors).0,
            "\\ul https://example.com\\ulnone "
        );
    }

    #[test]
    fn color_marker_switches_and_restores() {
        let colors = ColorTable::build("#00FF00 go", None);
        let (out, plain) = render(&[lit("#00FF00 go")], &colors);
        assert_eq!(out, "\\cf1 go\\cf0 ");
        assert_eq!(plain, "go");
    }

    #[test]
    fn marker_not_at_start_is_plain_text() {
        let colors = ColorTable::build("say #00FF00 go", None);
        let (out, _) = render(&[lit("say #00FF00 go")], &colors);
        assert_eq!(out, "say #00FF00 go");
    }

    #[test]
    fn unregistered_marker_falls_back_to_default() {
        let colors = ColorTable::build("", None);
        let (out, _) = render(&[lit("#123456 x")], &colors);
        assert_eq!(out, "\\cf0 x\\cf0 ");
    }

    #[test]
    fn line_break_suppression() {
        let colors = ColorTable::build("", None);
        let spans = [lit("a"), Inline::LineBreak, lit("b")];
        let mut out = String::new();
        InlineWriter::new(&colors)
            .suppress_line_breaks(true)
            .write_all(&spans, &mut out, None);
        assert_eq!(out, "ab");
        assert_eq!(render(&spans, &colors).0, "a\\line b");
    }
}
