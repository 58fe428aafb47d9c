//! Font embedding through the document API
//!
//! A table driven [`FontProgram`] stands in for a real font engine so the
//! tests can check exactly which glyphs reach the subsetter.

use folio_pdf::{
    BoxError, Document, FaceState, FontFlavor, FontMetrics, FontProgram, PdfError, SubsetMode,
    SubsetOutput, SubsetRequest,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct TableFont {
    name: &'static str,
    glyphs: HashMap<char, u16>,
    requests: Arc<Mutex<Vec<SubsetRequest>>>,
    fail: bool,
}

impl TableFont {
    fn new(name: &'static str) -> Self {
        let glyphs = [('H', 43), ('e', 72), ('l', 79), ('o', 82), (' ', 3), ('é', 140)]
            .into_iter()
            .collect();
        Self {
            name,
            glyphs,
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }
}

impl FontProgram for TableFont {
    fn units_per_em(&self) -> u16 {
        2048
    }

    fn postscript_name(&self) -> String {
        self.name.to_string()
    }

    fn glyph_index(&self, c: char) -> Option<u16> {
        self.glyphs.get(&c).copied()
    }

    fn advance_width(&self, glyph: u16) -> Option<u16> {
        match glyph {
            0 => Some(1024),
            3 => Some(512),
            _ => Some(1229),
        }
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            bbox: [-1000, -500, 2500, 2000],
            ascent: 1900,
            descent: -500,
            cap_height: 1400,
            x_height: 1000,
            italic_angle: 0.0,
            weight_class: 400,
            fixed_pitch: false,
            italic: false,
            flavor: FontFlavor::TrueType,
        }
    }

    fn subset(&self, request: &SubsetRequest) -> Result<SubsetOutput, BoxError> {
        if self.fail {
            return Err("glyf table is damaged".into());
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(SubsetOutput {
            data: vec![0u8; 64],
            gid_map: None,
        })
    }
}

#[test]
fn test_used_face_is_embedded_as_type0() {
    let program = TableFont::new("Table-Regular");
    let requests = Arc::clone(&program.requests);

    let mut doc = Document::new(Vec::new());
    let face_id = doc.load_face(Box::new(program), "table.ttf");

    let glyphs = {
        let face = doc.face_mut(face_id).unwrap();
        let glyphs = face.codepoints("Hello é");
        face.register_codepoints(&glyphs).unwrap();
        glyphs
    };
    let face_name = doc.face(face_id).unwrap().internal_name();
    let tag = doc.face(face_id).unwrap().subset_tag();

    let mut content = doc.new_object();
    write!(content, "BT {} 12 Tf <", face_name).unwrap();
    for glyph in &glyphs {
        write!(content, "{:04X}", glyph).unwrap();
    }
    write!(content, "> Tj ET").unwrap();
    doc.add_page(content, None).add_face(face_id);
    doc.finish().unwrap();

    assert_eq!(doc.face(face_id).unwrap().state(), FaceState::Finished);
    let request = requests.lock().unwrap()[0].clone();
    assert_eq!(request.mode, SubsetMode::RetainGids);
    assert_eq!(request.glyphs, vec![0, 3, 43, 72, 79, 82, 140]);

    let text = String::from_utf8_lossy(&doc.into_inner()).into_owned();
    assert!(text.contains("/Subtype /Type0"));
    assert!(text.contains("/Encoding /Identity-H"));
    assert!(text.contains(&format!("/BaseFont /{}+Table-Regular", tag)));
    assert!(text.contains("/FontFile2 "));
    assert!(text.contains("/ToUnicode "));
    assert!(text.contains("<008C> <00E9>"));
    assert!(text.contains("/Font <<"));
    assert!(text.contains(&format!("{} ", face_name)));
    assert!(text.contains("/W [0 [500] 3 [250] 43 [600] 72 [600] 79 [600] 82 [600] 140 [600]]"));
}

#[test]
fn test_unused_face_is_skipped() {
    let program = TableFont::new("Unused-Regular");
    let requests = Arc::clone(&program.requests);

    let mut doc = Document::new(Vec::new());
    let face_id = doc.load_face(Box::new(program), "unused.ttf");
    let content = doc.new_object();
    doc.add_page(content, None);
    doc.finish().unwrap();

    assert_eq!(doc.face(face_id).unwrap().state(), FaceState::Created);
    assert!(requests.lock().unwrap().is_empty());
    let text = String::from_utf8_lossy(&doc.into_inner()).into_owned();
    assert!(!text.contains("Unused-Regular"));
}

#[test]
fn test_face_ids_are_sequential() {
    let mut doc = Document::new(Vec::new());
    let first = doc.load_face(Box::new(TableFont::new("A")), "a.ttf");
    let second = doc.load_face(Box::new(TableFont::new("B")), "b.ttf");
    assert_eq!(first.value() + 1, second.value());
    assert_eq!(doc.face(first).unwrap().internal_name(), format!("/F{}", first.value()));
}

#[test]
fn test_subsetter_failure_is_reported() {
    let mut program = TableFont::new("Broken-Regular");
    program.fail = true;

    let mut doc = Document::new(Vec::new());
    let face_id = doc.load_face(Box::new(program), "broken.ttf");
    let content = doc.new_object();
    doc.add_page(content, None).add_face(face_id);

    match doc.finish() {
        Err(PdfError::Collaborator {
            operation, subject, ..
        }) => {
            assert_eq!(operation, "subset");
            assert_eq!(subject, "broken.ttf");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(!doc.is_finished());
}
