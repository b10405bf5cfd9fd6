//! Edit buffer used by transformers to splice generated content into a module.
//!
//! The buffer never mutates the original text. Edits are recorded against
//! offsets in the original and applied when the buffer is materialized, so a
//! transformer can keep using positions it computed from [`EditBuffer::original`]
//! no matter how many edits came before.

use crate::error::EditError;
use regex::{Captures, Regex};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EditKind {
    Insert,
    Overwrite,
}

#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    kind: EditKind,
    seq: usize,
    content: String,
}

#[derive(Debug, Clone)]
pub struct EditBuffer {
    original: String,
    intro: Vec<String>,
    outro: Vec<String>,
    edits: Vec<Edit>,
    next_seq: usize,
}

impl EditBuffer {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            intro: Vec::new(),
            outro: Vec::new(),
            edits: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Replaces `start..end` of the original text with `content`.
    pub fn overwrite(
        &mut self,
        start: usize,
        end: usize,
        content: impl Into<String>,
    ) -> Result<&mut Self, EditError> {
        self.check_range(start, end)?;
        if start == end {
            return Err(EditError::EmptyRange(start));
        }

        if self.overlaps(start, end) {
            return Err(EditError::Overlap { start, end });
        }

        self.push_edit(start, end, EditKind::Overwrite, content.into());
        Ok(self)
    }

    pub fn remove(&mut self, start: usize, end: usize) -> Result<&mut Self, EditError> {
        self.overwrite(start, end, String::new())
    }

    /// Inserts `content` at `index`. Inserts at the same index keep call order.
    pub fn insert(
        &mut self,
        index: usize,
        content: impl Into<String>,
    ) -> Result<&mut Self, EditError> {
        self.check_range(index, index)?;

        let inside_overwrite = self.edits.iter().any(|edit| {
            edit.kind == EditKind::Overwrite && edit.start < index && index < edit.end
        });
        if inside_overwrite {
            return Err(EditError::Overlap {
                start: index,
                end: index,
            });
        }

        self.push_edit(index, index, EditKind::Insert, content.into());
        Ok(self)
    }

    /// Adds `content` before everything else; the latest prepend ends up first.
    pub fn prepend(&mut self, content: impl Into<String>) -> &mut Self {
        self.intro.push(content.into());
        self
    }

    pub fn append(&mut self, content: impl Into<String>) -> &mut Self {
        self.outro.push(content.into());
        self
    }

    /// Overwrites every match of `pattern` in the original text with the
    /// replacer's output. Matches that collide with existing edits are left
    /// alone and never reach the replacer. Returns the number of matches
    /// rewritten.
    pub fn replace_all<F>(&mut self, pattern: &Regex, mut replacer: F) -> usize
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        let mut replacements = Vec::new();
        for caps in pattern.captures_iter(&self.original) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let (start, end) = (whole.start(), whole.end());
            if start == end || self.overlaps(start, end) {
                continue;
            }
            replacements.push((start, end, replacer(&caps)));
        }

        let count = replacements.len();
        for (start, end, content) in replacements {
            self.push_edit(start, end, EditKind::Overwrite, content);
        }
        count
    }

    /// True when the materialized text differs from the original.
    pub fn has_changed(&self) -> bool {
        self.to_string() != self.original
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len() + self.intro.len() + self.outro.len()
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), EditError> {
        let len = self.original.len();
        if start > end || end > len {
            return Err(EditError::OutOfBounds { start, end, len });
        }
        for offset in [start, end] {
            if !self.original.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.edits.iter().any(|edit| match edit.kind {
            EditKind::Overwrite => start < edit.end && edit.start < end,
            EditKind::Insert => start < edit.start && edit.start < end,
        })
    }

    fn push_edit(&mut self, start: usize, end: usize, kind: EditKind, content: String) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.edits.push(Edit {
            start,
            end,
            kind,
            seq,
            content,
        });
    }
}

impl fmt::Display for EditBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for intro in self.intro.iter().rev() {
            f.write_str(intro)?;
        }

        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.start, edit.kind, edit.seq));

        let mut cursor = 0;
        for edit in ordered {
            if edit.start > cursor {
                f.write_str(&self.original[cursor..edit.start])?;
                cursor = edit.start;
            }
            f.write_str(&edit.content)?;
            if edit.kind == EditKind::Overwrite {
                cursor = edit.end;
            }
        }
        f.write_str(&self.original[cursor..])?;

        for outro in &self.outro {
            f.write_str(outro)?;
        }
        Ok(())
    }
}
