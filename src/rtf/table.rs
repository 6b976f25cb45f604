//! Pipe tables, laid out as space-padded monospace rows.

use super::{InlineWriter, PAR, RenderContext};
use crate::block::{Inline, Table, TableCell};
use crate::color::split_leading_marker;
use crate::escape::push_escaped;
use crate::width::display_width;

/// A cell rendered once, before any row is written.
#[derive(Debug)]
struct CellSnapshot {
    plain: String,
    /// `None` when the cell is a single unstyled text run
    formatted: Option<String>,
    width: usize,
}

impl CellSnapshot {
    fn new(writer: &InlineWriter<'_>, cell: &TableCell) -> Self {
        let spans: Vec<&Inline> = cell.inlines().collect();

        if let [Inline::Literal(text)] = spans.as_slice() {
            if split_leading_marker(text).is_none() {
                return Self {
                    width: display_width(text),
                    plain: text.clone(),
                    formatted: None,
                };
            }
        }

        let mut plain = String::new();
        let mut formatted = String::new();
        for span in spans {
            writer.write(span, &mut formatted, Some(&mut plain));
        }
        Self {
            width: display_width(&plain),
            plain,
            formatted: Some(formatted),
        }
    }
}

/// Widest cell in each column.
fn column_widths(rows: &[Vec<CellSnapshot>]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        if widths.len() < row.len() {
            widths.resize(row.len(), 0);
        }
        for (max, cell) in widths.iter_mut().zip(row) {
            *max = (*max).max(cell.width);
        }
    }
    widths
}

impl RenderContext<'_> {
    pub(super) fn table(&mut self, table: &Table) {
        let writer = InlineWriter::new(self.colors).suppress_line_breaks(true);
        let rows: Vec<Vec<CellSnapshot>> = table
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| CellSnapshot::new(&writer, cell))
                    .collect()
            })
            .collect();
        let widths = column_widths(&rows);
        tracing::trace!(rows = rows.len(), ?widths, "laying out table");

        for row in &rows {
            self.out
                .push_str(&format!("\\pard\\sa0\\fs{} ", self.base_size));
            for (cell, max) in row.iter().zip(&widths) {
                match &cell.formatted {
                    Some(formatted) => self.out.push_str(formatted),
                    None => push_escaped(&mut self.out, &cell.plain),
                }
                let padding = max.saturating_sub(cell.width);
                self.out.push_str(&" ".repeat(padding));
            }
            self.out.push_str(PAR);
        }
    }
}
