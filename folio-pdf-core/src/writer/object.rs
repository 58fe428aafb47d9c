use crate::objects::{Array, Dictionary, Object, ObjectId};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Number reserved, nothing written yet.
    Reserved,
    /// Bytes appended to the output; the object is frozen.
    Saved,
}

/// One numbered unit of PDF content: a dictionary, an array or a stream.
///
/// An object is created through [`PdfWriter::new_object`](crate::writer::PdfWriter::new_object),
/// filled over time and written once with
/// [`PdfWriter::save`](crate::writer::PdfWriter::save). The stream payload is
/// filled through the [`io::Write`] impl or [`IndirectObject::set_data`].
///
/// A raw object holds everything between `N 0 obj` and `endobj` verbatim in
/// its payload; dictionary and array are ignored for raw objects.
#[derive(Debug, Clone)]
pub struct IndirectObject {
    id: ObjectId,
    pub dictionary: Dictionary,
    pub array: Array,
    data: Vec<u8>,
    raw: bool,
    force_stream: bool,
    compress: bool,
    comment: Option<String>,
    state: ObjectState,
}

impl IndirectObject {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            dictionary: Dictionary::new(),
            array: Array::new(),
            data: Vec::new(),
            raw: false,
            force_stream: false,
            compress: false,
            comment: None,
            state: ObjectState::Reserved,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn is_saved(&self) -> bool {
        self.state == ObjectState::Saved
    }

    pub(crate) fn mark_saved(&mut self) {
        self.state = ObjectState::Saved;
    }

    /// Replaces the dictionary, builder style.
    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_array(mut self, array: Array) -> Self {
        self.array = array;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    pub(crate) fn take_data(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Turns on stream compression when `level` is non-zero.
    pub fn set_compression(&mut self, level: u32) {
        self.compress = level > 0;
    }

    pub fn is_compressed(&self) -> bool {
        self.compress
    }

    /// Writes a stream even if the payload is empty.
    pub fn set_force_stream(&mut self, force: bool) {
        self.force_stream = force;
    }

    pub fn is_stream(&self) -> bool {
        self.force_stream || !self.data.is_empty()
    }

    pub fn set_raw(&mut self, raw: bool) {
        self.raw = raw;
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// A `%` comment line written right before the object header.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The body between header and `endobj`: the dictionary if it has entries,
    /// otherwise the array (if any).
    pub(crate) fn body(&self) -> Vec<u8> {
        if !self.dictionary.is_empty() {
            self.dictionary.to_pdf_bytes()
        } else if !self.array.is_empty() {
            Object::from(self.array.clone()).to_pdf_bytes()
        } else {
            Vec::new()
        }
    }
}

impl io::Write for IndirectObject {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
