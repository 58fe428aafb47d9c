use crate::objects::Object;

/// Builder for array values. Converts into [`Object::Array`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    elements: Vec<Object>,
}

impl Array {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, object: impl Into<Object>) {
        self.elements.push(object.into());
    }

    /// Chaining form of [`Array::push`].
    pub fn with(mut self, object: impl Into<Object>) -> Self {
        self.push(object);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Object> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.elements.iter()
    }

    pub fn into_vec(self) -> Vec<Object> {
        self.elements
    }

    pub fn as_slice(&self) -> &[Object] {
        &self.elements
    }

    /// Array of reals, the usual shape of rectangles and matrices.
    pub fn from_reals(values: &[f64]) -> Self {
        values.iter().map(|v| Object::Real(*v)).collect()
    }

    pub fn from_integers(values: &[i64]) -> Self {
        values.iter().map(|v| Object::Integer(*v)).collect()
    }
}

impl From<Vec<Object>> for Array {
    fn from(elements: Vec<Object>) -> Self {
        Self { elements }
    }
}

impl From<Array> for Vec<Object> {
    fn from(array: Array) -> Self {
        array.elements
    }
}

impl FromIterator<Object> for Array {
    fn from_iter<T: IntoIterator<Item = Object>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;

    #[test]
    fn test_push_and_chain() {
        let arr = Array::new()
            .with(ObjectId::new(3))
            .with(Object::name("XYZ"))
            .with(10)
            .with(Object::Null);

        assert_eq!(arr.len(), 4);
        assert_eq!(arr.get(0), Some(&Object::Reference(ObjectId::new(3))));
        assert_eq!(arr.get(3), Some(&Object::Null));
        assert_eq!(arr.get(4), None);
    }

    #[test]
    fn test_numeric_constructors() {
        let reals = Array::from_reals(&[0.0, 0.5]);
        assert_eq!(reals.as_slice(), &[Object::Real(0.0), Object::Real(0.5)]);

        let ints = Array::from_integers(&[1, 2, 3]);
        assert_eq!(ints.len(), 3);
        assert!(!ints.is_empty());
    }

    #[test]
    fn test_into_object() {
        let arr = Array::from_integers(&[4]);
        let obj: Object = arr.into();
        assert_eq!(obj, Object::Array(vec![Object::Integer(4)]));
    }

    #[test]
    fn test_clear() {
        let mut arr: Array = vec![Object::Integer(1)].into();
        arr.clear();
        assert!(arr.is_empty());
        assert_eq!(Vec::<Object>::from(arr), Vec::new());
    }
}
