use crate::arena::Entry;
use crate::avl_tree::cursor::Cursor;
use crate::avl_tree::node::{Node, NodeArena};
use crate::avl_tree::tree::{self, Tree};
use log::debug;
use std::fmt;
use std::iter::FromIterator;

/// The number of nodes stored per arena chunk by `AvlSet::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes are stored in a typed
/// arena and link to their parents, and the root hangs off a value-less sentinel node that
/// represents the end position of the set. Cursors and iterators walk the tree through these
/// parent links, so advancing costs amortized constant time.
///
/// # Examples
/// ```
/// use avl_set::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// assert!(set.insert(0));
/// assert!(set.insert(3));
/// assert!(!set.insert(3));
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
/// assert_eq!(set.lower_bound(&1).get(), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct AvlSet<T> {
    arena: NodeArena<T>,
    sentinel: Entry,
    len: usize,
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlSet<T>` whose nodes are allocated `chunk_size` at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::with_chunk_size(1024);
    /// assert_eq!(set.chunk_size(), 1024);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let mut arena = NodeArena::new(chunk_size);
        let sentinel = arena.allocate(Node::sentinel());
        AvlSet {
            arena,
            sentinel,
            len: 0,
        }
    }

    fn root(&self) -> Tree {
        self.arena[self.sentinel].left
    }

    fn attach_root(&mut self, root: Tree) {
        self.arena[self.sentinel].left = root;
        if let Some(root) = root {
            self.arena[root].parent = Some(self.sentinel);
        }
    }

    fn cursor(&self, tree: Tree) -> Cursor<T> {
        Cursor::new(&self.arena, self.sentinel, tree.unwrap_or(self.sentinel))
    }

    /// Returns the number of nodes stored per arena chunk.
    pub fn chunk_size(&self) -> usize {
        self.arena.chunk_size()
    }

    /// Inserts a key into the set. Returns `true` if the key was added, and `false` if an equal
    /// key already exists, in which case the set is left unchanged.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let root = self.root();
        let (root, inserted) = tree::insert(&mut self.arena, root, key);
        if inserted {
            self.len += 1;
        }
        self.attach_root(Some(root));
        inserted
    }

    /// Removes a key from the set. If the key exists in the set, it will return the stored key.
    /// Otherwise it will return `None`.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let root = self.root();
        let (root, removed) = tree::remove(&mut self.arena, root, key);
        self.attach_root(root);
        removed.map(|entry| {
            self.len -= 1;
            self.arena.free(&entry).into_value()
        })
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        !self.find(key).is_end()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the underlying tree, which is zero for an empty set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = (0..7).collect();
    /// assert_eq!(set.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.arena, self.root())
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing avl set with {} elements", self.len);
        self.arena.clear();
        self.sentinel = self.arena.allocate(Node::sentinel());
        self.len = 0;
    }

    /// Returns a cursor at the first element that is not less than a particular key, or the end
    /// cursor if such an element does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(set.lower_bound(&0).get(), Some(&1));
    /// assert_eq!(set.lower_bound(&3).get(), Some(&3));
    /// assert_eq!(set.lower_bound(&4), set.end());
    /// ```
    pub fn lower_bound(&self, key: &T) -> Cursor<T> {
        self.cursor(tree::lower_bound(&self.arena, self.root(), key))
    }

    /// Returns a cursor at the element equal to a particular key, or the end cursor if the key
    /// does not exist in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(set.find(&3).get(), Some(&3));
    /// assert_eq!(set.find(&2), set.end());
    /// ```
    pub fn find(&self, key: &T) -> Cursor<T> {
        let cursor = self.lower_bound(key);
        match cursor.get() {
            Some(value) if !(key < value) => cursor,
            _ => self.end(),
        }
    }

    /// Returns a cursor at the minimum element, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor<T> {
        self.cursor(Some(tree::leftmost(&self.arena, self.sentinel)))
    }

    /// Returns the end cursor, which is positioned one past the maximum element.
    pub fn end(&self) -> Cursor<T> {
        self.cursor(None)
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.cursor(tree::floor(&self.arena, self.root(), key)).get()
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.lower_bound(key).get()
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.begin().get()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.end().peek_prev()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal
    /// and can be consumed from both ends.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next_back(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            arena: &self.arena,
            front: tree::leftmost(&self.arena, self.sentinel),
            back: self.sentinel,
            len: self.len,
        }
    }
}

impl<T> IntoIterator for AvlSet<T>
where
    T: Ord,
{
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let front = tree::leftmost(&self.arena, self.sentinel);
        Self::IntoIter {
            front,
            back: self.sentinel,
            len: self.len,
            arena: self.arena,
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct AvlSetIntoIter<T> {
    arena: NodeArena<T>,
    front: Entry,
    back: Entry,
    len: usize,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let entry = self.front;
        self.front = tree::successor(&self.arena, entry);
        self.len -= 1;
        self.arena[entry].value.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for AvlSetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.back = tree::predecessor(&self.arena, self.back);
        self.len -= 1;
        self.arena[self.back].value.take()
    }
}

impl<T> ExactSizeIterator for AvlSetIntoIter<T> {}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    arena: &'a NodeArena<T>,
    front: Entry,
    back: Entry,
    len: usize,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let entry = self.front;
        self.front = tree::successor(self.arena, entry);
        self.len -= 1;
        self.arena[entry].value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.back = tree::predecessor(self.arena, self.back);
        self.len -= 1;
        self.arena[self.back].value.as_ref()
    }
}

impl<'a, T> ExactSizeIterator for AvlSetIter<'a, T> where T: 'a {}

impl<T> Default for AvlSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for AvlSet<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        debug!("copying avl set with {} elements", self.len);
        let mut arena = NodeArena::new(self.arena.chunk_size());
        let sentinel = arena.allocate(Node::sentinel());
        let root = tree::copy(&self.arena, self.arena[self.sentinel].left, &mut arena, sentinel);
        arena[sentinel].left = root;
        AvlSet {
            arena,
            sentinel,
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // an unwinding copy must leave an empty set, not the old contents
        self.arena.clear();
        self.sentinel = self.arena.allocate(Node::sentinel());
        self.len = 0;
        *self = source.clone();
    }
}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> From<Vec<T>> for AvlSet<T>
where
    T: Ord,
{
    fn from(keys: Vec<T>) -> Self {
        keys.into_iter().collect()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: Ord,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Ord {}

impl<T> fmt::Debug for AvlSet<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
