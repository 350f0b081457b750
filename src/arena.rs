//! Chunked, free-list backed storage for the nodes of a tree.

use log::debug;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Handles stay valid until the object is freed. A freed slot is recycled by the next allocation,
/// so a handle must not be used after the object it refers to has been freed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Entry>),
}

/// An allocator for objects of a single type, addressed by stable `Entry` handles.
///
/// Objects are stored in fixed-size chunks. A chunk is never reallocated once created, and
/// freed slots are threaded onto a free list that the next allocation pops from. All remaining
/// objects are dropped together when the arena is dropped or cleared.
///
/// # Examples
///
/// ```
/// use avl_set::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Entry>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, entry: &Entry) -> Option<&Block<T>> {
        self.chunks
            .get(entry.chunk_index)
            .and_then(|chunk| chunk.get(entry.block_index))
    }

    fn block_mut(&mut self, entry: &Entry) -> Option<&mut Block<T>> {
        self.chunks
            .get_mut(entry.chunk_index)
            .and_then(|chunk| chunk.get_mut(entry.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` that stores `chunk_size` objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(64);
    /// assert_eq!(arena.chunk_size(), 64);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        if chunk_size == 0 {
            panic!("Error: chunk size must be positive.");
        }
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Stores an object in the arena and returns its handle. Vacant slots are reused before a new
    /// chunk is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(64);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Entry {
        self.len += 1;

        if let Some(entry) = self.head.take() {
            let vacant_block = mem::replace(
                &mut self.chunks[entry.chunk_index][entry.block_index],
                Block::Occupied(value),
            );
            return match vacant_block {
                Block::Vacant(next_entry) => {
                    self.head = next_entry;
                    entry
                },
                Block::Occupied(_) => panic!("Error: free list points to an occupied block."),
            };
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
            debug!(
                "arena grew to {} chunks ({} slots)",
                self.chunks.len(),
                self.capacity,
            );
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Block::Occupied(value));
        Entry {
            chunk_index,
            block_index: chunk.len() - 1,
        }
    }

    /// Removes an object from the arena and returns it. The slot is recycled by a later
    /// allocation.
    ///
    /// # Panics
    ///
    /// Panics if `entry` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(64);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        let head = self.head;
        let block = match self.block_mut(entry) {
            Some(block) => block,
            None => panic!("Error: attempting to free invalid block."),
        };
        if let Block::Vacant(_) = *block {
            panic!("Error: attempting to free vacant block.");
        }

        match mem::replace(block, Block::Vacant(head)) {
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(*entry);
                value
            },
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if `entry` does not
    /// refer to an occupied slot.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.block(entry) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if `entry` does not refer
    /// to an occupied slot.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        match self.block_mut(entry) {
            Some(Block::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of objects currently stored in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena stores no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects stored per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Drops every object and releases every chunk. All outstanding handles become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(64);
    /// let x = arena.allocate(0);
    /// arena.clear();
    /// assert_eq!(arena.get(&x), None);
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}
