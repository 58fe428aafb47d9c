//! Spot colors as `/Separation` color spaces with a CMYK alternate.

use crate::error::Result;
use crate::objects::{Array, Dictionary, Object, ObjectId};
use crate::writer::PdfWriter;
use std::io::Write;

/// A document level spot color.
#[derive(Debug, Clone, PartialEq)]
pub struct Separation {
    /// Colorant name, e.g. `HKS 43`
    pub name: String,
    /// Resource name in the pages' `/ColorSpace` dictionaries
    pub id: String,
    pub object: ObjectId,
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Separation {
    /// CMYK values are clamped to 0.0-1.0.
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        object: ObjectId,
        c: f64,
        m: f64,
        y: f64,
        k: f64,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            object,
            c: c.clamp(0.0, 1.0),
            m: m.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            k: k.clamp(0.0, 1.0),
        }
    }

    /// `[/Separation /name /DeviceCMYK <<tint transform>>]`
    pub fn to_array(&self) -> Array {
        let mut tint = Dictionary::new();
        tint.set("FunctionType", 2);
        tint.set("Domain", Array::from_integers(&[0, 1]));
        tint.set("C0", Array::from_integers(&[0, 0, 0, 0]));
        tint.set("C1", Array::from_reals(&[self.c, self.m, self.y, self.k]));
        tint.set("N", 1);

        Array::new()
            .with(Object::name("Separation"))
            .with(Object::name(self.name.as_str()))
            .with(Object::name("DeviceCMYK"))
            .with(tint)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut PdfWriter<W>) -> Result<()> {
        let mut obj = writer.new_object_with_number(self.object).with_array(self.to_array());
        writer.save(&mut obj)
    }
}
