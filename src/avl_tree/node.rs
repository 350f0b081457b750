use crate::arena::{Entry, TypedArena};
use crate::avl_tree::tree::{self, Tree};
use std::cmp;

pub type NodeArena<T> = TypedArena<Node<T>>;

/// A struct representing a node of an avl tree. The sentinel node that anchors the tree carries no
/// value and has no parent.
pub struct Node<T> {
    pub value: Option<T>,
    pub height: usize,
    pub parent: Option<Entry>,
    pub left: Tree,
    pub right: Tree,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value: Some(value),
            height: 1,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn sentinel() -> Self {
        Node {
            value: None,
            height: 0,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn value(&self) -> &T {
        self.value
            .as_ref()
            .expect("Expected a value-bearing node, found the sentinel.")
    }

    pub fn into_value(self) -> T {
        self.value
            .expect("Expected a value-bearing node, found the sentinel.")
    }
}

// Recomputes the cached height of `entry` and points its children back at it.
pub fn update<T>(arena: &mut NodeArena<T>, entry: Entry) {
    let (left, right) = {
        let node = &arena[entry];
        (node.left, node.right)
    };
    for child in left.iter().chain(right.iter()) {
        arena[*child].parent = Some(entry);
    }
    arena[entry].height = cmp::max(tree::height(arena, left), tree::height(arena, right)) + 1;
}

pub fn balance<T>(arena: &NodeArena<T>, entry: Entry) -> i32 {
    let node = &arena[entry];
    (tree::height(arena, node.left) as i32) - (tree::height(arena, node.right) as i32)
}
