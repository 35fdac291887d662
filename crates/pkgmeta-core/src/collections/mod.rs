//! Insertion-ordered containers with a selectable enumeration order.
//!
//! One map type and one list type cover both the plain and the alphabetical
//! variants; the [`KeyOrder`] chosen at construction decides how entries are
//! enumerated. Sorting happens on every read so mutations are always visible.

mod list;
mod map;

pub use list::OrderedList;
pub use map::OrderedMap;

use std::cmp::Reverse;

/// Enumeration order of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Entries come out in the order they were added.
    #[default]
    Insertion,
    /// Entries come out sorted case-insensitively by their string form.
    ///
    /// Keys equal under case folding put the lowercase spelling first.
    Alphabetical,
}

impl KeyOrder {
    /// Reorder `items` in place according to this order, using `project` as
    /// the string form of each item. Insertion order is a no-op.
    pub(crate) fn arrange<T>(self, items: &mut [T], project: impl Fn(&T) -> String) {
        if self == Self::Alphabetical {
            items.sort_by_cached_key(|item| {
                let text = project(item);
                (text.to_lowercase(), Reverse(text))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arranged(order: KeyOrder, input: &[&str]) -> Vec<String> {
        let mut items: Vec<String> = input.iter().map(ToString::to_string).collect();
        order.arrange(&mut items, Clone::clone);
        items
    }

    #[test]
    fn test_insertion_keeps_order() {
        assert_eq!(
            arranged(KeyOrder::Insertion, &["b", "A", "c"]),
            vec!["b", "A", "c"]
        );
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        assert_eq!(
            arranged(KeyOrder::Alphabetical, &["beta", "Alpha", "gamma", "Delta"]),
            vec!["Alpha", "beta", "Delta", "gamma"]
        );
    }

    #[test]
    fn test_alphabetical_tie_break_lowercase_first() {
        assert_eq!(
            arranged(KeyOrder::Alphabetical, &["A", "a", "B", "b"]),
            vec!["a", "A", "b", "B"]
        );
    }
}
