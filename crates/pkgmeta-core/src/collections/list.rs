use super::KeyOrder;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt::Display;

/// An ordered sequence with index-based and value-based removal.
///
/// Indices always refer to the enumeration order, so for an alphabetical
/// list `remove_at(0)` removes the first item of the sorted view.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    items: Vec<T>,
    order: KeyOrder,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            order: KeyOrder::Insertion,
        }
    }
}

impl<T> OrderedList<T>
where
    T: PartialEq + Display,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_order(order: KeyOrder) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    #[must_use]
    pub fn order(&self) -> KeyOrder {
        self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map an index of the enumeration order to the storage index.
    fn storage_index(&self, index: usize) -> Option<usize> {
        let mut positions: Vec<usize> = (0..self.items.len()).collect();
        self.order
            .arrange(&mut positions, |&i| self.items[i].to_string());
        positions.get(index).copied()
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn add_range<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
    }

    /// Insert at a storage position. Only meaningful for insertion-ordered lists.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::key_not_found(index));
        }
        self.items.insert(index, item);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.storage_index(index)
            .map(|i| &self.items[i])
            .ok_or_else(|| Error::key_not_found(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let i = self
            .storage_index(index)
            .ok_or_else(|| Error::key_not_found(index))?;
        Ok(self.items.remove(i))
    }

    /// Remove the first occurrence of `item`.
    pub fn remove(&mut self, item: &T) -> Result<T> {
        let i = self
            .items
            .iter()
            .position(|x| x == item)
            .ok_or_else(|| Error::key_not_found(item))?;
        Ok(self.items.remove(i))
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in enumeration order.
    #[must_use]
    pub fn items(&self) -> Vec<&T> {
        let mut view: Vec<&T> = self.items.iter().collect();
        self.order.arrange(&mut view, |item| item.to_string());
        view
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items().into_iter()
    }

    #[must_use]
    pub fn to_values(&self) -> Vec<Value>
    where
        T: Clone + Into<Value>,
    {
        self.items().into_iter().map(|x| x.clone().into()).collect()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            order: KeyOrder::Insertion,
        }
    }
}
