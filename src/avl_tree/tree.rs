use crate::arena::Entry;
use crate::avl_tree::node::{self, Node, NodeArena};
use log::trace;
use std::cmp::Ordering;

pub type Tree = Option<Entry>;

pub fn height<T>(arena: &NodeArena<T>, tree: Tree) -> usize {
    match tree {
        None => 0,
        Some(entry) => arena[entry].height,
    }
}

pub fn balance<T>(arena: &NodeArena<T>, tree: Tree) -> i32 {
    match tree {
        None => 0,
        Some(entry) => node::balance(arena, entry),
    }
}

fn rotate_left<T>(arena: &mut NodeArena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].right {
        Some(child) => child,
        None => unreachable!(),
    };
    arena[entry].right = arena[child].left;
    arena[child].left = Some(entry);
    arena[child].parent = arena[entry].parent;
    node::update(arena, entry);
    node::update(arena, child);
    child
}

fn rotate_right<T>(arena: &mut NodeArena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].left {
        Some(child) => child,
        None => unreachable!(),
    };
    arena[entry].left = arena[child].right;
    arena[child].right = Some(entry);
    arena[child].parent = arena[entry].parent;
    node::update(arena, entry);
    node::update(arena, child);
    child
}

// Restores the avl invariant at `entry`, assuming both subtrees are balanced and their heights
// differ by at most two. Returns the root of the rebalanced subtree.
fn rebalance<T>(arena: &mut NodeArena<T>, entry: Entry) -> Entry {
    match node::balance(arena, entry) {
        -2 => {
            let child = arena[entry].right;
            if balance(arena, child) > 0 {
                trace!("rotating right-left");
                let rotated = rotate_right(arena, child.expect("Expected a right child."));
                arena[entry].right = Some(rotated);
            } else {
                trace!("rotating left");
            }
            rotate_left(arena, entry)
        },
        2 => {
            let child = arena[entry].left;
            if balance(arena, child) < 0 {
                trace!("rotating left-right");
                let rotated = rotate_left(arena, child.expect("Expected a left child."));
                arena[entry].left = Some(rotated);
            } else {
                trace!("rotating right");
            }
            rotate_right(arena, entry)
        },
        _ => entry,
    }
}

/// Inserts `value` into the subtree rooted at `tree`. Returns the new root of the subtree and
/// whether a node was added. A value equal to an existing one is dropped.
pub fn insert<T>(arena: &mut NodeArena<T>, tree: Tree, value: T) -> (Entry, bool)
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return (arena.allocate(Node::new(value)), true),
    };

    let inserted = match value.cmp(arena[entry].value()) {
        Ordering::Less => {
            let left = arena[entry].left;
            let (child, inserted) = insert(arena, left, value);
            arena[entry].left = Some(child);
            inserted
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let (child, inserted) = insert(arena, right, value);
            arena[entry].right = Some(child);
            inserted
        },
        Ordering::Equal => return (entry, false),
    };

    node::update(arena, entry);
    (rebalance(arena, entry), inserted)
}

// Unlinks the maximum node of the subtree rooted at `entry`. Returns the new root of the subtree
// and the detached node.
fn remove_max<T>(arena: &mut NodeArena<T>, entry: Entry) -> (Tree, Entry) {
    match arena[entry].right {
        None => {
            let rest = arena[entry].left.take();
            (rest, entry)
        },
        Some(right) => {
            let (child, max) = remove_max(arena, right);
            arena[entry].right = child;
            node::update(arena, entry);
            (Some(rebalance(arena, entry)), max)
        },
    }
}

// Unlinks the minimum node of the subtree rooted at `entry`. Returns the new root of the subtree
// and the detached node.
fn remove_min<T>(arena: &mut NodeArena<T>, entry: Entry) -> (Tree, Entry) {
    match arena[entry].left {
        None => {
            let rest = arena[entry].right.take();
            (rest, entry)
        },
        Some(left) => {
            let (child, min) = remove_min(arena, left);
            arena[entry].left = child;
            node::update(arena, entry);
            (Some(rebalance(arena, entry)), min)
        },
    }
}

/// Removes the node equal to `key` from the subtree rooted at `tree`. Returns the new root of the
/// subtree and the detached node, which is still allocated in the arena and must be freed by the
/// caller.
pub fn remove<T>(arena: &mut NodeArena<T>, tree: Tree, key: &T) -> (Tree, Option<Entry>)
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return (None, None),
    };

    let removed = match key.cmp(arena[entry].value()) {
        Ordering::Less => {
            let left = arena[entry].left;
            let (child, removed) = remove(arena, left, key);
            arena[entry].left = child;
            removed
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let (child, removed) = remove(arena, right, key);
            arena[entry].right = child;
            removed
        },
        Ordering::Equal => return (splice_out(arena, entry), Some(entry)),
    };

    node::update(arena, entry);
    (Some(rebalance(arena, entry)), removed)
}

// Detaches `entry` from its subtree, promoting its in-order predecessor when the left subtree is
// at least as tall as the right one, and its in-order successor otherwise.
fn splice_out<T>(arena: &mut NodeArena<T>, entry: Entry) -> Tree {
    let Node { left, right, parent, .. } = arena[entry];
    let promoted = match (left, right) {
        (None, None) => return None,
        (Some(left), right) if node::balance(arena, entry) >= 0 => {
            let (rest, promoted) = remove_max(arena, left);
            arena[promoted].left = rest;
            arena[promoted].right = right;
            promoted
        },
        (left, Some(right)) => {
            let (rest, promoted) = remove_min(arena, right);
            arena[promoted].left = left;
            arena[promoted].right = rest;
            promoted
        },
        (Some(_), None) => unreachable!(),
    };

    let removed = &mut arena[entry];
    removed.left = None;
    removed.right = None;
    removed.parent = None;

    arena[promoted].parent = parent;
    node::update(arena, promoted);
    Some(rebalance(arena, promoted))
}

/// Returns the node holding the least value that is not less than `key`.
pub fn lower_bound<T>(arena: &NodeArena<T>, tree: Tree, key: &T) -> Tree
where
    T: Ord,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        if node.value() < key {
            lower_bound(arena, node.right, key)
        } else {
            lower_bound(arena, node.left, key).or(Some(entry))
        }
    })
}

/// Returns the node holding the greatest value that is not greater than `key`.
pub fn floor<T>(arena: &NodeArena<T>, tree: Tree, key: &T) -> Tree
where
    T: Ord,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        if key < node.value() {
            floor(arena, node.left, key)
        } else {
            floor(arena, node.right, key).or(Some(entry))
        }
    })
}

pub fn leftmost<T>(arena: &NodeArena<T>, mut entry: Entry) -> Entry {
    while let Some(left) = arena[entry].left {
        entry = left;
    }
    entry
}

pub fn rightmost<T>(arena: &NodeArena<T>, mut entry: Entry) -> Entry {
    while let Some(right) = arena[entry].right {
        entry = right;
    }
    entry
}

/// Returns the in-order successor of `entry`. The successor of the maximum node is the sentinel,
/// and the successor of the sentinel is the minimum node (or the sentinel if the tree is empty).
pub fn successor<T>(arena: &NodeArena<T>, entry: Entry) -> Entry {
    if let Some(right) = arena[entry].right {
        return leftmost(arena, right);
    }

    let mut curr = entry;
    while let Some(parent) = arena[curr].parent {
        if arena[parent].right != Some(curr) {
            return parent;
        }
        curr = parent;
    }

    // only the sentinel has no parent
    leftmost(arena, curr)
}

/// Returns the in-order predecessor of `entry`. The predecessor of the sentinel is the maximum
/// node, and the predecessor of the minimum node is the sentinel.
pub fn predecessor<T>(arena: &NodeArena<T>, entry: Entry) -> Entry {
    if let Some(left) = arena[entry].left {
        return rightmost(arena, left);
    }

    let mut curr = entry;
    while let Some(parent) = arena[curr].parent {
        if arena[parent].left != Some(curr) {
            return parent;
        }
        curr = parent;
    }
    curr
}

/// Deep-copies the subtree rooted at `tree` from `src` into `dest`, attaching the copy to
/// `parent`. Returns the root of the copy.
pub fn copy<T>(src: &NodeArena<T>, tree: Tree, dest: &mut NodeArena<T>, parent: Entry) -> Tree
where
    T: Clone,
{
    tree.map(|entry| {
        let node = &src[entry];
        let copied = dest.allocate(Node {
            value: node.value.clone(),
            height: node.height,
            parent: Some(parent),
            left: None,
            right: None,
        });
        let left = copy(src, node.left, dest, copied);
        let right = copy(src, node.right, dest, copied);
        dest[copied].left = left;
        dest[copied].right = right;
        copied
    })
}

/// Checks the ordering, balance, height and parent invariants of the subtree rooted at `tree`
/// whose root should point back at `parent`. Returns the number of nodes in the subtree.
#[cfg(test)]
pub fn check<T>(arena: &NodeArena<T>, tree: Tree, parent: Entry) -> usize
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return 0,
    };
    let node = &arena[entry];
    assert_eq!(node.parent, Some(parent));
    assert!(node.value.is_some());
    if let Some(left) = node.left {
        assert!(arena[left].value() < node.value());
    }
    if let Some(right) = node.right {
        assert!(arena[right].value() > node.value());
    }

    let left_height = height(arena, node.left);
    let right_height = height(arena, node.right);
    assert_eq!(node.height, left_height.max(right_height) + 1);
    assert!((left_height as i32 - right_height as i32).abs() <= 1);

    check(arena, node.left, entry) + check(arena, node.right, entry) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[u32]) -> (NodeArena<u32>, Entry) {
        let mut arena = NodeArena::new(8);
        let sentinel = arena.allocate(Node::sentinel());
        for value in values {
            let root = arena[sentinel].left;
            let (root, _) = insert(&mut arena, root, *value);
            arena[sentinel].left = Some(root);
            arena[root].parent = Some(sentinel);
        }
        (arena, sentinel)
    }

    fn traverse(arena: &NodeArena<u32>, sentinel: Entry) -> Vec<u32> {
        let mut ret = Vec::new();
        let mut curr = successor(arena, sentinel);
        while curr != sentinel {
            ret.push(*arena[curr].value());
            curr = successor(arena, curr);
        }
        ret
    }

    #[test]
    fn test_single_rotations() {
        let (arena, sentinel) = build(&[1, 2, 3]);
        let root = arena[sentinel].left.unwrap();
        assert_eq!(*arena[root].value(), 2);
        assert_eq!(check(&arena, Some(root), sentinel), 3);

        let (arena, sentinel) = build(&[3, 2, 1]);
        let root = arena[sentinel].left.unwrap();
        assert_eq!(*arena[root].value(), 2);
        assert_eq!(check(&arena, Some(root), sentinel), 3);
    }

    #[test]
    fn test_double_rotations() {
        let (arena, sentinel) = build(&[1, 3, 2]);
        let root = arena[sentinel].left.unwrap();
        assert_eq!(*arena[root].value(), 2);
        assert_eq!(arena[root].height, 2);
        check(&arena, Some(root), sentinel);

        let (arena, sentinel) = build(&[3, 1, 2]);
        let root = arena[sentinel].left.unwrap();
        assert_eq!(*arena[root].value(), 2);
        check(&arena, Some(root), sentinel);
    }

    #[test]
    fn test_insert_duplicate() {
        let (mut arena, sentinel) = build(&[2, 1, 3]);
        let root = arena[sentinel].left;
        let (new_root, inserted) = insert(&mut arena, root, 3);
        assert!(!inserted);
        assert_eq!(Some(new_root), root);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_remove_prefers_predecessor_on_tie() {
        let (mut arena, sentinel) = build(&[2, 1, 3]);
        let root = arena[sentinel].left;
        let (root, removed) = remove(&mut arena, root, &2);
        let root = root.unwrap();
        assert_eq!(*arena[root].value(), 1);
        assert_eq!(arena[root].right.map(|entry| *arena[entry].value()), Some(3));
        assert_eq!(*arena[removed.unwrap()].value(), 2);
    }

    #[test]
    fn test_remove_promotes_successor_when_right_is_taller() {
        let (mut arena, sentinel) = build(&[2, 1, 3, 4]);
        let root = arena[sentinel].left;
        let (root, _) = remove(&mut arena, root, &2);
        let root = root.unwrap();
        assert_eq!(*arena[root].value(), 3);
        arena[sentinel].left = Some(root);
        arena[root].parent = Some(sentinel);
        assert_eq!(check(&arena, Some(root), sentinel), 3);
        assert_eq!(traverse(&arena, sentinel), vec![1, 3, 4]);
    }

    #[test]
    fn test_remove_missing() {
        let (mut arena, sentinel) = build(&[2, 1, 3]);
        let root = arena[sentinel].left;
        let (new_root, removed) = remove(&mut arena, root, &5);
        assert_eq!(new_root, root);
        assert_eq!(removed, None);
    }

    #[test]
    fn test_remove_rebalances() {
        let values: Vec<u32> = (0..64).collect();
        let (mut arena, sentinel) = build(&values);
        for value in (0..64).filter(|value| value % 3 != 0) {
            let root = arena[sentinel].left;
            let (root, removed) = remove(&mut arena, root, &value);
            arena.free(&removed.unwrap());
            arena[sentinel].left = root;
            if let Some(root) = root {
                arena[root].parent = Some(sentinel);
            }
            check(&arena, arena[sentinel].left, sentinel);
        }
        assert_eq!(
            traverse(&arena, sentinel),
            (0..64).filter(|value| value % 3 == 0).collect::<Vec<u32>>(),
        );
    }

    #[test]
    fn test_lower_bound_floor() {
        let (arena, sentinel) = build(&[10, 20, 30]);
        let root = arena[sentinel].left;
        let value_of = |tree: Tree| tree.map(|entry| *arena[entry].value());

        assert_eq!(value_of(lower_bound(&arena, root, &5)), Some(10));
        assert_eq!(value_of(lower_bound(&arena, root, &20)), Some(20));
        assert_eq!(value_of(lower_bound(&arena, root, &21)), Some(30));
        assert_eq!(value_of(lower_bound(&arena, root, &31)), None);

        assert_eq!(value_of(floor(&arena, root, &5)), None);
        assert_eq!(value_of(floor(&arena, root, &20)), Some(20));
        assert_eq!(value_of(floor(&arena, root, &29)), Some(20));
        assert_eq!(value_of(floor(&arena, root, &31)), Some(30));
    }

    #[test]
    fn test_successor_predecessor_through_sentinel() {
        let (arena, sentinel) = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(traverse(&arena, sentinel), (1..8).collect::<Vec<u32>>());

        let max = predecessor(&arena, sentinel);
        assert_eq!(*arena[max].value(), 7);
        assert_eq!(successor(&arena, max), sentinel);

        let min = successor(&arena, sentinel);
        assert_eq!(*arena[min].value(), 1);
        assert_eq!(predecessor(&arena, min), sentinel);
    }

    #[test]
    fn test_empty_sentinel_navigation() {
        let (arena, sentinel) = build(&[]);
        assert_eq!(successor(&arena, sentinel), sentinel);
        assert_eq!(predecessor(&arena, sentinel), sentinel);
    }

    #[test]
    fn test_copy() {
        let (src, src_sentinel) = build(&[5, 3, 8, 1]);
        let mut dest = NodeArena::new(2);
        let dest_sentinel = dest.allocate(Node::sentinel());
        let root = copy(&src, src[src_sentinel].left, &mut dest, dest_sentinel);
        dest[dest_sentinel].left = root;

        assert_eq!(check(&dest, root, dest_sentinel), 4);
        assert_eq!(traverse(&dest, dest_sentinel), vec![1, 3, 5, 8]);
        assert_eq!(height(&dest, root), height(&src, src[src_sentinel].left));
    }
}
