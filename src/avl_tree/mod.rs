//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod cursor;
mod node;
mod set;
mod tree;

pub use self::cursor::Cursor;
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter, DEFAULT_CHUNK_SIZE};
