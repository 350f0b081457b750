//! An ordered set backed by an avl tree whose nodes live in a typed arena.
//!
//! # Examples
//! ```
//! #[macro_use]
//! extern crate avl_set;
//!
//! # fn main() {
//! let set = avl_set![5, 3, 8, 1, 3];
//! assert_eq!(set.len(), 4);
//! assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5, &8]);
//! # }
//! ```

pub mod arena;
pub mod avl_tree;

/// Creates an `AvlSet` containing the arguments. Duplicate arguments are dropped.
///
/// # Examples
/// ```
/// #[macro_use]
/// extern crate avl_set;
///
/// # fn main() {
/// let set = avl_set![2, 1, 2];
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Some(&1));
///
/// let empty: avl_set::avl_tree::AvlSet<u32> = avl_set![];
/// assert!(empty.is_empty());
/// # }
/// ```
#[macro_export]
macro_rules! avl_set {
    () => {
        $crate::avl_tree::AvlSet::new()
    };
    ($($key:expr),+ $(,)*) => {{
        let mut set = $crate::avl_tree::AvlSet::new();
        $(set.insert($key);)+
        set
    }};
}
