use super::KeyOrder;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt::Display;

/// A string-like keyed map that remembers insertion order.
///
/// Keys are unique: adding a present key fails with [`Error::DuplicateKey`],
/// and removing or reading an absent key fails with [`Error::KeyNotFound`].
/// [`OrderedMap::has`] is the total lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    order: KeyOrder,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            order: KeyOrder::Insertion,
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: PartialEq + Display,
{
    /// Create an empty map enumerated in insertion order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with the given enumeration order.
    #[must_use]
    pub fn with_order(order: KeyOrder) -> Self {
        Self {
            entries: Vec::new(),
            order,
        }
    }

    #[must_use]
    pub fn order(&self) -> KeyOrder {
        self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }

    /// Add a new entry.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.position(&key).is_some() {
            return Err(Error::duplicate_key(&key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Add an entry unless the key is already present. Returns whether it was added.
    pub fn add_if_absent(&mut self, key: K, value: V) -> bool {
        if self.position(&key).is_some() {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Add every pair in order.
    ///
    /// Stops at the first duplicate key. Entries added before it are kept.
    pub fn add_range<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.add(key, value)?;
        }
        Ok(())
    }

    /// Remove an entry, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + Display + ?Sized,
    {
        let index = self.position(key).ok_or_else(|| Error::key_not_found(key))?;
        Ok(self.entries.remove(index).1)
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + Display + ?Sized,
    {
        self.position(key)
            .map(|i| &self.entries[i].1)
            .ok_or_else(|| Error::key_not_found(key))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: PartialEq + Display + ?Sized,
    {
        match self.position(key) {
            Some(i) => Ok(&mut self.entries[i].1),
            None => Err(Error::key_not_found(key)),
        }
    }

    #[must_use]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in enumeration order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&K, &V)> {
        let mut view: Vec<(&K, &V)> = self.entries.iter().map(|(k, v)| (k, v)).collect();
        self.order.arrange(&mut view, |(k, _)| k.to_string());
        view
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries().into_iter()
    }

    /// Project to a JSON object keyed by the string form of each key.
    ///
    /// Distinct keys with the same string form collide; the later entry wins.
    #[must_use]
    pub fn to_record(&self) -> Map<String, Value>
    where
        V: Clone + Into<Value>,
    {
        let mut record = Map::new();
        for (key, value) in self.entries() {
            record.insert(key.to_string(), value.clone().into());
        }
        record
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V>
where
    K: PartialEq + Display,
{
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = self.entries;
        self.order.arrange(&mut entries, |(k, _)| k.to_string());
        entries.into_iter()
    }
}

impl OrderedMap<String, Value> {
    /// Build a map from the own keys of a JSON object, in their order.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            entries: record.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            order: KeyOrder::Insertion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use serde_json::json;

    fn map_of(order: KeyOrder, keys: &[&str]) -> OrderedMap<String, String> {
        let mut map = OrderedMap::with_order(order);
        for key in keys {
            map.add((*key).to_string(), format!("v-{key}")).unwrap();
        }
        map
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut map = map_of(KeyOrder::Insertion, &["a"]);
        let err = map.add("a".to_string(), "again".to_string()).unwrap_err();
        assert_eq!(err.code(), codes::DUPLICATE_KEY);
        assert_eq!(map.get("a").unwrap(), "v-a");
    }

    #[test]
    fn test_remove_and_get_missing_fail() {
        let mut map = map_of(KeyOrder::Insertion, &["a"]);
        assert_eq!(map.remove("b").unwrap_err().code(), codes::KEY_NOT_FOUND);
        assert_eq!(map.get("b").unwrap_err().code(), codes::KEY_NOT_FOUND);
        assert!(!map.has("b"));
        assert_eq!(map.remove("a").unwrap(), "v-a");
        assert!(map.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let map = map_of(KeyOrder::Insertion, &["zeta", "alpha", "Mid"]);
        assert_eq!(map.keys(), vec!["zeta", "alpha", "Mid"]);
    }

    #[test]
    fn test_alphabetical_order_independent_of_insertion() {
        let a = map_of(KeyOrder::Alphabetical, &["zeta", "alpha", "Mid"]);
        let b = map_of(KeyOrder::Alphabetical, &["Mid", "zeta", "alpha"]);
        assert_eq!(a.keys(), vec!["alpha", "Mid", "zeta"]);
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_alphabetical_reflects_mutation_immediately() {
        let mut map = map_of(KeyOrder::Alphabetical, &["b", "d"]);
        map.add("C".to_string(), "v-C".to_string()).unwrap();
        assert_eq!(map.keys(), vec!["b", "C", "d"]);
        map.remove("b").unwrap();
        assert_eq!(map.keys(), vec!["C", "d"]);
    }

    #[test]
    fn test_add_range_does_not_roll_back() {
        let mut map = map_of(KeyOrder::Insertion, &["b"]);
        let result = map.add_range(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);

        assert_eq!(result.unwrap_err().code(), codes::DUPLICATE_KEY);
        assert_eq!(map.keys(), vec!["b", "a"]);
        assert_eq!(map.get("b").unwrap(), "v-b");
    }

    #[test]
    fn test_add_range_from_other_map() {
        let mut map = map_of(KeyOrder::Insertion, &["a"]);
        map.add_range(map_of(KeyOrder::Insertion, &["b", "c"]))
            .unwrap();
        assert_eq!(map.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_if_absent_keeps_first_value() {
        let mut map = map_of(KeyOrder::Insertion, &["a"]);
        assert!(!map.add_if_absent("a".to_string(), "other".to_string()));
        assert!(map.add_if_absent("b".to_string(), "v-b".to_string()));
        assert_eq!(map.values(), vec!["v-a", "v-b"]);
    }

    #[test]
    fn test_clear() {
        let mut map = map_of(KeyOrder::Insertion, &["a", "b"]);
        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.entries().is_empty());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut map = map_of(KeyOrder::Insertion, &["a", "b"]);
        *map.get_mut("a").unwrap() = "changed".to_string();
        assert_eq!(map.values(), vec!["changed", "v-b"]);
    }

    #[test]
    fn test_to_record_stringifies_keys() {
        let mut map: OrderedMap<u32, String> = OrderedMap::new();
        map.add(1, "one".to_string()).unwrap();
        map.add(20, "twenty".to_string()).unwrap();

        assert_eq!(
            Value::Object(map.to_record()),
            json!({"1": "one", "20": "twenty"})
        );
    }

    #[derive(Debug, PartialEq)]
    struct Tagged(&'static str, u8);

    impl Display for Tagged {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    #[test]
    fn test_to_record_collision_last_write_wins() {
        let mut map: OrderedMap<Tagged, Value> = OrderedMap::new();
        map.add(Tagged("same", 1), json!("first")).unwrap();
        map.add(Tagged("same", 2), json!("second")).unwrap();

        let record = map.to_record();
        assert_eq!(record.len(), 1);
        assert_eq!(record["same"], json!("second"));
    }

    #[test]
    fn test_from_record_keeps_object_order() {
        let record = json!({"start": "node .", "build": "tsc", "test": "jest"});
        let map = OrderedMap::from_record(record.as_object().unwrap());
        assert_eq!(map.keys(), vec!["start", "build", "test"]);
        assert_eq!(Value::Object(map.to_record()), record);
    }

    #[test]
    fn test_into_iter_follows_enumeration_order() {
        let map = map_of(KeyOrder::Alphabetical, &["b", "A"]);
        let keys: Vec<String> = map.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "b"]);
    }
}
