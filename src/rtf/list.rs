//! Lists.
//!
//! RTF has no list object here, so nesting is drawn with `\li` indents and
//! explicit `\par` placement. `ListState::depth` tracks the nesting level and
//! `pending_break` records that the last item paragraph is still open.

use super::{PAR, RenderContext};
use crate::block::{Block, List};

/// Left indent per nesting level, in twips
const INDENT_STEP: i32 = 360;

impl RenderContext<'_> {
    pub(super) fn list(&mut self, list: &List) {
        if self.list.depth >= 0 {
            // Nested: end the parent item's paragraph first
            self.out.push_str(PAR);
        }
        self.list.depth += 1;
        let indent = INDENT_STEP * self.list.depth;

        for item in &list.items {
            if self.list.pending_break {
                self.out.push_str(PAR);
                self.list.pending_break = false;
            }
            self.open_item_paragraph(indent);
            if list.ordered {
                self.out.push_str(&format!("{}. ", item.ordinal));
            } else {
                self.out.push_str("\\bullet ");
            }

            for (i, block) in item.blocks.iter().enumerate() {
                match block {
                    Block::Paragraph { content } => {
                        if self.list.pending_break {
                            // Second paragraph of the same item
                            self.out.push_str(PAR);
                            self.open_item_paragraph(indent);
                        }
                        self.inlines(content);
                        self.list.pending_break = true;
                    }
                    Block::List(nested) => {
                        self.list.pending_break = false;
                        self.list(nested);
                    }
                    other => {
                        if self.list.pending_break || i == 0 {
                            self.out.push_str(PAR);
                        }
                        self.list.pending_break = false;
                        self.block(other);
                    }
                }
            }
        }

        self.list.depth -= 1;
        if self.list.depth < 0 {
            self.out.push_str(PAR);
            self.list.pending_break = false;
        }
    }

    fn open_item_paragraph(&mut self, indent: i32) {
        self.out.push_str(&format!(
            "\\pard\\li{indent}\\sa100\\fs{} ",
            self.base_size
        ));
    }
}
