use crate::arena::Entry;
use crate::avl_tree::node::NodeArena;
use crate::avl_tree::tree;
use std::fmt;
use std::ptr;

/// A read-only position in an `AvlSet<T>`.
///
/// A cursor either points at an element or at the end position, which sits one past the maximum
/// element and one before the minimum element. Moving forward from the end position wraps around
/// to the minimum element, and moving backward wraps around to the maximum element.
///
/// # Examples
/// ```
/// use avl_set::avl_tree::AvlSet;
///
/// let set: AvlSet<u32> = vec![1, 3, 5].into_iter().collect();
///
/// let mut cursor = set.lower_bound(&2);
/// assert_eq!(cursor.get(), Some(&3));
///
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&5));
///
/// cursor.move_next();
/// assert!(cursor.is_end());
/// assert_eq!(cursor, set.end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&5));
/// ```
pub struct Cursor<'a, T>
where
    T: 'a,
{
    arena: &'a NodeArena<T>,
    sentinel: Entry,
    entry: Entry,
}

impl<'a, T> Cursor<'a, T>
where
    T: 'a,
{
    pub(crate) fn new(arena: &'a NodeArena<T>, sentinel: Entry, entry: Entry) -> Self {
        Cursor {
            arena,
            sentinel,
            entry,
        }
    }

    /// Returns a reference to the element at the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.arena[self.entry].value.as_ref()
    }

    /// Returns `true` if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.entry == self.sentinel
    }

    /// Moves the cursor to the next element in order. Moving past the maximum element lands on
    /// the end position.
    pub fn move_next(&mut self) {
        self.entry = tree::successor(self.arena, self.entry);
    }

    /// Moves the cursor to the previous element in order. Moving back from the minimum element
    /// lands on the end position.
    pub fn move_prev(&mut self) {
        self.entry = tree::predecessor(self.arena, self.entry);
    }

    /// Returns a reference to the element after the cursor without moving it.
    pub fn peek_next(&self) -> Option<&'a T> {
        self.arena[tree::successor(self.arena, self.entry)].value.as_ref()
    }

    /// Returns a reference to the element before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.arena[tree::predecessor(self.arena, self.entry)].value.as_ref()
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Cursor<'a, T>) -> bool {
        ptr::eq(self.arena, other.arena) && self.entry == other.entry
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> fmt::Debug for Cursor<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::avl_tree::AvlSet;

    #[test]
    fn test_begin_end_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.begin(), set.end());
        assert!(set.begin().is_end());
        assert_eq!(set.begin().get(), None);
    }

    #[test]
    fn test_forward_walk() {
        let set: AvlSet<u32> = vec![5, 3, 8, 1, 4, 7, 9].into_iter().collect();
        let mut cursor = set.begin();
        let mut values = Vec::new();
        while let Some(value) = cursor.get() {
            values.push(*value);
            cursor.move_next();
        }
        assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(cursor, set.end());
    }

    #[test]
    fn test_backward_walk() {
        let set: AvlSet<u32> = (0..100).collect();
        let mut cursor = set.end();
        let mut values = Vec::new();
        loop {
            cursor.move_prev();
            match cursor.get() {
                Some(value) => values.push(*value),
                None => break,
            }
        }
        assert_eq!(values, (0..100).rev().collect::<Vec<u32>>());
    }

    #[test]
    fn test_next_then_prev() {
        let set: AvlSet<u32> = (0..50).map(|value| value * 2).collect();
        let mut cursor = set.begin();
        cursor.move_next();
        while !cursor.is_end() && cursor.peek_next().is_some() {
            let before = cursor;
            cursor.move_next();
            cursor.move_prev();
            assert_eq!(cursor, before);
            cursor.move_prev();
            cursor.move_next();
            assert_eq!(cursor, before);
            cursor.move_next();
        }
    }

    #[test]
    fn test_wrap_around() {
        let set: AvlSet<u32> = vec![1, 2, 3].into_iter().collect();
        let mut cursor = set.begin();
        cursor.move_prev();
        assert!(cursor.is_end());
        cursor.move_next();
        assert_eq!(cursor.get(), Some(&1));

        let mut cursor = set.end();
        assert_eq!(cursor.peek_next(), Some(&1));
        assert_eq!(cursor.peek_prev(), Some(&3));
        cursor.move_next();
        assert_eq!(cursor, set.begin());
    }

    #[test]
    fn test_cursors_of_different_sets() {
        let a: AvlSet<u32> = AvlSet::new();
        let b: AvlSet<u32> = AvlSet::new();
        assert_ne!(a.end(), b.end());
    }

    #[test]
    fn test_debug() {
        let set: AvlSet<u32> = vec![1].into_iter().collect();
        assert_eq!(format!("{:?}", set.begin()), "Cursor(Some(1))");
        assert_eq!(format!("{:?}", set.end()), "Cursor(None)");
    }
}
