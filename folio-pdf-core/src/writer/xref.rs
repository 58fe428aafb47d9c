//! Cross-reference table and trailer.
//!
//! The table has one section per maximal run of consecutive object numbers
//! that were actually written, so reserved but never saved numbers leave gaps
//! instead of bogus entries.

use super::PdfWriter;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

/// A run of consecutive object numbers with their byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefSection {
    pub first: u32,
    pub offsets: Vec<u64>,
}

/// Groups recorded locations into contiguous sections, scanning `0..=last`.
pub fn collect_sections(locations: &HashMap<u32, u64>, last: u32) -> Vec<XrefSection> {
    let mut sections = Vec::new();
    let mut current: Option<XrefSection> = None;
    for number in 0..=last {
        match locations.get(&number) {
            Some(offset) => match current.as_mut() {
                Some(section) => section.offsets.push(*offset),
                None => {
                    current = Some(XrefSection {
                        first: number,
                        offsets: vec![*offset],
                    })
                }
            },
            None => {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
            }
        }
    }
    if let Some(section) = current {
        sections.push(section);
    }
    sections
}

/// Renders the sections as they appear after the `xref` keyword. Every entry
/// line is exactly 20 bytes.
pub fn render_sections(sections: &[XrefSection]) -> String {
    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "{} {}", section.first, section.offsets.len());
        for (i, offset) in section.offsets.iter().enumerate() {
            if section.first as usize + i == 0 {
                out.push_str("0000000000 65535 f \n");
            } else {
                let _ = writeln!(out, "{:010} 00000 n ", offset);
            }
        }
    }
    out
}

/// File identifier: uppercase hex MD5 of the rendered xref sections.
pub fn file_id(rendered: &str) -> String {
    format!("{:X}", md5::compute(rendered.as_bytes()))
}

impl<W: Write> PdfWriter<W> {
    /// Writes the `xref` table, the trailer dictionary and `startxref`, then
    /// flushes the sink.
    pub fn write_xref_and_trailer(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<()> {
        let next = self.peek_next_object();
        let sections = collect_sections(&self.object_locations, next);
        let rendered = render_sections(&sections);
        let id = file_id(&rendered);

        self.eol()?;
        let xref_position = self.current_position;
        self.write_bytes(b"xref\n")?;
        self.write_bytes(rendered.as_bytes())?;

        let mut trailer = Dictionary::new();
        trailer.set("Size", next);
        trailer.set("Root", root);
        trailer.set(
            "ID",
            Object::Array(vec![Object::raw(format!("<{}>", id)), Object::raw(format!("<{}>", id))]),
        );
        if let Some(info) = info {
            trailer.set("Info", info);
        }

        self.write_bytes(b"trailer\n")?;
        self.write_bytes(&trailer.to_pdf_bytes())?;
        let tail = format!("\nstartxref\n{}\n%%EOF\n", xref_position);
        self.write_bytes(tail.as_bytes())?;
        self.flush()?;

        tracing::debug!(
            "wrote xref with {} sections at {}, /Size {}",
            sections.len(),
            xref_position,
            next
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_sections_sparse() {
        let mut locations = HashMap::new();
        locations.insert(0, 0);
        locations.insert(1, 15);
        locations.insert(2, 60);
        locations.insert(5, 120);

        let sections = collect_sections(&locations, 6);
        assert_eq!(
            sections,
            vec![
                XrefSection {
                    first: 0,
                    offsets: vec![0, 15, 60]
                },
                XrefSection {
                    first: 5,
                    offsets: vec![120]
                },
            ]
        );
    }

    #[test]
    fn test_render_sections() {
        let sections = vec![
            XrefSection {
                first: 0,
                offsets: vec![0, 15],
            },
            XrefSection {
                first: 4,
                offsets: vec![1234],
            },
        ];
        let rendered = render_sections(&sections);
        assert_eq!(
            rendered,
            "0 2\n0000000000 65535 f \n0000000015 00000 n \n4 1\n0000001234 00000 n \n"
        );
        for line in rendered.lines().filter(|l| l.len() > 10) {
            assert_eq!(line.len() + 1, 20);
        }
    }

    #[test]
    fn test_file_id_is_uppercase_md5() {
        let id = file_id("0 1\n0000000000 65535 f \n");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_eq!(id, file_id("0 1\n0000000000 65535 f \n"));
    }

    #[test]
    fn test_trailer_output() {
        let mut writer = PdfWriter::new(Vec::new());
        let mut catalog = writer.new_object();
        catalog.dictionary.set("Type", Object::name("Catalog"));
        let _unused = writer.next_object();
        writer.save(&mut catalog).unwrap();
        writer.write_xref_and_trailer(catalog.id(), None).unwrap();

        let bytes = writer.into_inner();
        let xref_at = bytes
            .windows(5)
            .position(|w| w == b"xref\n")
            .unwrap();
        let out = String::from_utf8_lossy(&bytes).into_owned();
        assert!(out.contains("xref\n0 2\n0000000000 65535 f \n"));
        assert!(out.contains("/Size 3\n"));
        assert!(out.contains("/Root 1 0 R\n"));
        assert!(!out.contains("/Info"));
        assert!(out.ends_with("%%EOF\n"));

        assert!(out.contains(&format!("startxref\n{}\n", xref_at)));
    }
}
