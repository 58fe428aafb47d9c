//! Named destinations.

use crate::error::Result;
use crate::objects::{Array, Dictionary, Object, ObjectId};
use crate::writer::PdfWriter;
use std::io::Write;

/// A named jump target: a point on a page, displayed at the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct NameDest {
    /// The `/Page` object of the target page
    pub page: ObjectId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl NameDest {
    pub fn new(page: ObjectId, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            page,
            name: name.into(),
            x,
            y,
        }
    }

    /// `[page /XYZ x y null]`
    pub fn to_array(&self) -> Array {
        Array::new()
            .with(self.page)
            .with(Object::name("XYZ"))
            .with(self.x)
            .with(self.y)
            .with(Object::Null)
    }

    /// Saves `<< /D [page /XYZ x y null] >>` as a new object.
    pub(crate) fn write<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<ObjectId> {
        let mut dict = Dictionary::new();
        dict.set("D", self.to_array());
        let mut obj = writer.new_object().with_dictionary(dict);
        writer.save(&mut obj)?;
        Ok(obj.id())
    }
}
