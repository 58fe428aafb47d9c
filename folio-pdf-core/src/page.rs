use crate::fonts::FaceId;
use crate::images::ImageId;
use crate::objects::{round_point, Array, Dictionary, Object, ObjectId};
use crate::writer::IndirectObject;

/// An annotation such as a link or a note.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation type without slash, e.g. `Link`
    pub subtype: String,
    /// The `/A` action
    pub action: Option<Object>,
    /// x1, y1, x2, y2
    pub rect: [f64; 4],
    /// Extra entries, merged last
    pub dictionary: Dictionary,
}

impl Annotation {
    pub fn new(subtype: impl Into<String>, rect: [f64; 4]) -> Self {
        Self {
            subtype: subtype.into(),
            action: None,
            rect,
            dictionary: Dictionary::new(),
        }
    }

    /// A link annotation opening `uri`.
    pub fn uri_link(rect: [f64; 4], uri: &str) -> Self {
        let mut action = Dictionary::new();
        action.set("Type", Object::name("Action"));
        action.set("S", Object::name("URI"));
        action.set("URI", uri);
        Self::new("Link", rect).with_action(action)
    }

    pub fn with_action(mut self, action: impl Into<Object>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub(crate) fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Annot"));
        dict.set("Subtype", Object::name(self.subtype.as_str()));
        if let Some(action) = &self.action {
            dict.set("A", action.clone());
        }
        dict.set("Rect", rect_array(&self.rect));
        dict.merge(&self.dictionary);
        dict
    }
}

pub(crate) fn rect_array(rect: &[f64; 4]) -> Array {
    rect.iter().map(|v| Object::Real(round_point(*v))).collect()
}

/// A single page. Created by [`crate::Document::add_page`]; the geometry
/// starts out as the document default.
///
/// Points are 1/72 of an inch.
#[derive(Debug)]
pub struct Page {
    id: ObjectId,
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub annotations: Vec<Annotation>,
    faces: Vec<FaceId>,
    images: Vec<ImageId>,
    /// Additional page dictionary entries such as `/TrimBox`, merged last.
    pub dictionary: Dictionary,
    content: IndirectObject,
}

impl Page {
    pub(crate) fn new(id: ObjectId, content: IndirectObject, geometry: PageGeometry) -> Self {
        Self {
            id,
            width: geometry.width,
            height: geometry.height,
            offset_x: geometry.offset_x,
            offset_y: geometry.offset_y,
            annotations: Vec::new(),
            faces: Vec::new(),
            images: Vec::new(),
            dictionary: Dictionary::new(),
            content,
        }
    }

    /// The `/Page` object.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn content(&self) -> &IndirectObject {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut IndirectObject {
        &mut self.content
    }

    /// Makes `face` available as `/F<id>` in the page resources.
    pub fn add_face(&mut self, face: FaceId) {
        if !self.faces.contains(&face) {
            self.faces.push(face);
        }
    }

    /// Makes `image` available as `/ImgBag<id>` in the page resources.
    pub fn add_image(&mut self, image: ImageId) {
        if !self.images.contains(&image) {
            self.images.push(image);
        }
    }

    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    pub fn images(&self) -> &[ImageId] {
        &self.images
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.width,
            height: self.height,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

/// Page size and origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// A4 (595 x 842 points)
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// US Letter (612 x 792 points)
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// `[offset_x offset_y width height]`
    pub fn media_box(&self) -> Array {
        rect_array(&[self.offset_x, self.offset_y, self.width, self.height])
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new(
            ObjectId::new(2),
            IndirectObject::new(ObjectId::new(1)),
            PageGeometry::a4(),
        )
    }

    #[test]
    fn test_page_starts_with_default_geometry() {
        let page = page();
        assert_eq!(page.id(), ObjectId::new(2));
        assert_eq!(page.geometry(), PageGeometry::a4());
        assert!(page.faces().is_empty());
    }

    #[test]
    fn test_resources_are_deduplicated() {
        let mut page = page();
        page.add_face(FaceId(1));
        page.add_face(FaceId(1));
        page.add_image(ImageId(3));
        page.add_image(ImageId(2));
        page.add_image(ImageId(3));
        assert_eq!(page.faces(), &[FaceId(1)]);
        assert_eq!(page.images(), &[ImageId(3), ImageId(2)]);
    }

    #[test]
    fn test_media_box_is_rounded() {
        let geometry = PageGeometry {
            width: 595.2756,
            height: 841.8898,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        assert_eq!(
            geometry.media_box().into_vec(),
            vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(595.28),
                Object::Real(841.89)
            ]
        );
    }

    #[test]
    fn test_annotation_dict() {
        let mut annot = Annotation::uri_link([10.0, 20.0, 110.0, 40.0], "https://example.com");
        annot.dictionary.set("Border", Array::from_integers(&[0, 0, 0]));
        let dict = annot.to_dict();

        assert_eq!(dict.get("Type"), Some(&Object::name("Annot")));
        assert_eq!(dict.get("Subtype"), Some(&Object::name("Link")));
        let action = dict.get("A").and_then(|a| a.as_dict()).unwrap();
        assert_eq!(
            action.get("URI"),
            Some(&Object::String("https://example.com".to_string()))
        );
        assert!(dict.contains_key("Border"));
        assert_eq!(dict.get("Rect").and_then(|r| r.as_array()).map(|r| r.len()), Some(4));
    }

    #[test]
    fn test_extra_entries_win() {
        let mut annot = Annotation::new("Text", [0.0; 4]);
        annot.dictionary.set("Subtype", Object::name("Square"));
        assert_eq!(annot.to_dict().get("Subtype"), Some(&Object::name("Square")));
    }
}
