use crate::objects::Object;
use std::collections::HashMap;

/// A PDF dictionary.
///
/// Entries are stored unordered; [`Dictionary::sorted_keys`] gives the
/// canonical output order (`Type` first, everything else lexicographic), so
/// two dictionaries with the same entries always serialize identically.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, Object>,
}

fn bare_key(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces an entry. A leading slash on the key is dropped,
    /// so `"/Type"` and `"Type"` address the same entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        let key = key.into();
        let key = match key.strip_prefix('/') {
            Some(stripped) => stripped.to_string(),
            None => key,
        };
        self.entries.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(bare_key(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(bare_key(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.remove(bare_key(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(bare_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    /// Returns the sub-dictionary stored under `key`, creating it (or
    /// replacing a non-dictionary value) when needed.
    pub fn entry_dict(&mut self, key: &str) -> &mut Dictionary {
        let slot = self
            .entries
            .entry(bare_key(key).to_string())
            .or_insert_with(|| Object::Dictionary(Dictionary::new()));
        if !matches!(slot, Object::Dictionary(_)) {
            *slot = Object::Dictionary(Dictionary::new());
        }
        match slot {
            Object::Dictionary(dict) => dict,
            _ => unreachable!("slot was just made a dictionary"),
        }
    }

    /// Copies every entry of `other` into `self`, overwriting on collision.
    pub fn merge(&mut self, other: &Dictionary) {
        for (key, value) in other.iter() {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Keys in output order: `Type` first, then the rest lexicographically.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_by(|a, b| match (*a == "Type", *b == "Type") {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.cmp(b),
        });
        keys
    }

    /// Serialized form at nesting level zero.
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        crate::objects::serialize::write_dictionary(&mut out, self, 0);
        out
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Name", "Test");
        dict.set("Age", 42);
        dict.set("Active", true);

        assert_eq!(dict.get("Name"), Some(&Object::String("Test".to_string())));
        assert_eq!(dict.get("Age"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Active"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_leading_slash_is_stripped() {
        let mut dict = Dictionary::new();
        dict.set("/Type", Object::name("Page"));
        dict.set("Type", Object::name("Pages"));

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("Type"), Some(&Object::name("Pages")));
        assert_eq!(dict.get("/Type"), Some(&Object::name("Pages")));
        assert!(dict.contains_key("/Type"));
        assert_eq!(dict.remove("/Type"), Some(Object::name("Pages")));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_get_mut() {
        let mut dict = Dictionary::new();
        dict.set("Counter", 1);

        if let Some(Object::Integer(val)) = dict.get_mut("Counter") {
            *val = 2;
        }

        assert_eq!(dict.get("Counter"), Some(&Object::Integer(2)));
    }

    #[test]
    fn test_sorted_keys_type_first() {
        let mut dict = Dictionary::new();
        dict.set("Resources", Dictionary::new());
        dict.set("Contents", ObjectId::new(4));
        dict.set("Type", Object::name("Page"));
        dict.set("Annots", Object::Array(vec![]));

        assert_eq!(
            dict.sorted_keys(),
            vec!["Type", "Annots", "Contents", "Resources"]
        );
    }

    #[test]
    fn test_entry_dict_creates_and_reuses() {
        let mut catalog = Dictionary::new();
        catalog.entry_dict("Names").set("Dests", ObjectId::new(8));
        catalog
            .entry_dict("/Names")
            .set("JavaScript", ObjectId::new(9));

        let names = catalog.get_dict("Names").unwrap();
        assert_eq!(names.len(), 2);

        catalog.set("Broken", 3);
        assert!(catalog.entry_dict("Broken").is_empty());
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base = Dictionary::new();
        base.set("Type", Object::name("Catalog"));
        base.set("PageMode", Object::name("UseNone"));

        let mut extra = Dictionary::new();
        extra.set("PageMode", Object::name("UseOutlines"));
        extra.set("Lang", "en");

        base.merge(&extra);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get("PageMode"), Some(&Object::name("UseOutlines")));
    }

    #[test]
    fn test_from_iterator() {
        let items = vec![
            ("Name".to_string(), Object::String("Test".to_string())),
            ("/Count".to_string(), Object::Integer(5)),
        ];

        let dict: Dictionary = items.into_iter().collect();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("Count"), Some(&Object::Integer(5)));
    }

    #[test]
    fn test_nested_dictionaries() {
        let mut root = Dictionary::new();
        let mut level1 = Dictionary::new();
        let mut level2 = Dictionary::new();

        level2.set("DeepValue", "Found");
        level1.set("Level2", Object::Dictionary(level2));
        root.set("Level1", Object::Dictionary(level1));

        let deep_value = root
            .get_dict("Level1")
            .and_then(|l1| l1.get_dict("Level2"))
            .and_then(|l2| l2.get("DeepValue"));

        assert_eq!(deep_value, Some(&Object::String("Found".to_string())));
    }
}
