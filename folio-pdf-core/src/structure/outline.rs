//! Document outline (bookmarks).

use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::writer::PdfWriter;
use std::io::Write;

/// Outline item (bookmark)
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    pub title: String,
    /// Name of a named destination
    pub dest: String,
    pub children: Vec<OutlineItem>,
    /// Whether the children are shown initially
    pub open: bool,
}

impl OutlineItem {
    pub fn new(title: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            dest: dest.into(),
            children: Vec::new(),
            open: true,
        }
    }

    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: OutlineItem) -> Self {
        self.children.push(child);
        self
    }

    /// Set closed by default
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    /// Count total items in subtree
    pub fn count_all(&self) -> i64 {
        1 + self.children.iter().map(|c| c.count_all()).sum::<i64>()
    }

    /// Count visible items (respecting open/closed state)
    pub fn count_visible(&self) -> i64 {
        let mut count = 1;
        if self.open {
            count += self.children.iter().map(|c| c.count_visible()).sum::<i64>();
        }
        count
    }

    /// Descendants shown when this item is opened.
    fn open_descendants(&self) -> i64 {
        self.children.iter().map(|c| c.count_visible()).sum()
    }
}

/// Visible item count of a list of top level items.
pub fn visible_count(items: &[OutlineItem]) -> i64 {
    items.iter().map(|item| item.count_visible()).sum()
}

/// Writes the `/Outlines` root and all items. Returns `None` for an empty
/// outline.
pub(crate) fn write_outlines<W: Write>(
    writer: &mut PdfWriter<W>,
    items: &[OutlineItem],
) -> Result<Option<ObjectId>> {
    if items.is_empty() {
        return Ok(None);
    }
    let mut root = writer.new_object();
    let (first, last) = write_siblings(writer, root.id(), items)?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("Outlines"));
    dict.set("First", first);
    dict.set("Last", last);
    dict.set("Count", visible_count(items));
    root.dictionary = dict;
    writer.save(&mut root)?;
    Ok(Some(root.id()))
}

/// Writes one sibling list below `parent`; returns the first and last item.
fn write_siblings<W: Write>(
    writer: &mut PdfWriter<W>,
    parent: ObjectId,
    items: &[OutlineItem],
) -> Result<(ObjectId, ObjectId)> {
    let ids: Vec<ObjectId> = items.iter().map(|_| writer.next_object()).collect();

    for (i, item) in items.iter().enumerate() {
        let mut dict = Dictionary::new();
        dict.set("Parent", parent);
        dict.set("Title", item.title.as_str());
        dict.set("Dest", item.dest.as_str());
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if let Some(next) = ids.get(i + 1) {
            dict.set("Next", *next);
        }

        if !item.children.is_empty() {
            let (first, last) = write_siblings(writer, ids[i], &item.children)?;
            dict.set("First", first);
            dict.set("Last", last);
            let count = item.open_descendants();
            dict.set("Count", if item.open { count } else { -count });
        }

        let mut obj = writer.new_object_with_number(ids[i]).with_dictionary(dict);
        writer.save(&mut obj)?;
    }

    // items is not empty
    Ok((ids[0], ids[ids.len() - 1]))
}
