//! Name trees with a single leaf node.

use crate::objects::{Array, Dictionary, Object};
use std::collections::BTreeMap;

/// A flat name tree. Keys are kept sorted so `/Names` and `/Limits` are
/// always ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTree {
    names: BTreeMap<String, Object>,
}

impl NameTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name, replacing an earlier value with the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Object>) {
        self.names.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.names.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First and last name.
    pub fn limits(&self) -> Option<(&str, &str)> {
        let first = self.names.keys().next()?;
        let last = self.names.keys().next_back()?;
        Some((first.as_str(), last.as_str()))
    }

    /// `<< /Limits [(first) (last)] /Names [(name) value ...] >>`
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        if let Some((first, last)) = self.limits() {
            dict.set(
                "Limits",
                Array::new()
                    .with(Object::String(first.to_string()))
                    .with(Object::String(last.to_string())),
            );
        }

        let mut names = Array::with_capacity(self.names.len() * 2);
        for (name, value) in &self.names {
            names.push(Object::String(name.clone()));
            names.push(value.clone());
        }
        dict.set("Names", names);
        dict
    }
}

impl FromIterator<(String, Object)> for NameTree {
    fn from_iter<I: IntoIterator<Item = (String, Object)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;

    #[test]
    fn test_names_are_sorted() {
        let mut tree = NameTree::new();
        tree.add("zeta", ObjectId::new(3));
        tree.add("alpha", ObjectId::new(4));
        tree.add("mu", ObjectId::new(5));

        assert_eq!(tree.limits(), Some(("alpha", "zeta")));
        let dict = tree.to_dict();
        let names = dict.get("Names").and_then(|n| n.as_array()).unwrap();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], Object::String("alpha".to_string()));
        assert_eq!(names[1], Object::Reference(ObjectId::new(4)));
        assert_eq!(names[4], Object::String("zeta".to_string()));
    }

    #[test]
    fn test_empty_tree_has_no_limits() {
        let tree = NameTree::new();
        assert!(tree.is_empty());
        assert!(tree.limits().is_none());
        assert!(tree.to_dict().get("Limits").is_none());
    }

    #[test]
    fn test_replace_value() {
        let mut tree = NameTree::new();
        tree.add("a", 1);
        tree.add("a", 2);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("a"), Some(&Object::Integer(2)));
    }
}
