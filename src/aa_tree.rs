//! An AA tree (Andersson's simplified red-black tree) whose ordering is supplied by
//! the caller on every operation.
//!
//! The visibility sweep orders edges by their distance from the current sweep
//! origin, and the origin changes from one sweep to the next, so the ordering cannot
//! be a fixed `Ord` impl. Every operation that needs to compare takes a closure
//! instead. The closure must describe a strict total order over the values currently
//! in the tree, and must answer `Equal` only for the value being looked up.

use core::cmp::Ordering;
use core::fmt::{Debug, Formatter};

struct Node<T> {
    value: T,
    level: u32,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

type Link<T> = Option<Box<Node<T>>>;

impl<T> Node<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            level: 1,
            left: None,
            right: None,
        })
    }
}

fn level<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |node| node.level)
}

// Removes a left horizontal link by rotating right.
fn skew<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.left.take() {
        Some(mut left) if left.level == node.level => {
            node.left = left.right.take();
            left.right = Some(node);
            left
        }
        left => {
            node.left = left;
            node
        }
    }
}

// Removes two consecutive right horizontal links by rotating left and promoting.
fn split<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.right.take() {
        Some(mut right) if level(&right.right) == node.level => {
            node.right = right.left.take();
            right.left = Some(node);
            right.level += 1;
            right
        }
        right => {
            node.right = right;
            node
        }
    }
}

// Restores the invariants on the way back up from a removal.
fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let should_be = 1 + level(&node.left).min(level(&node.right));
    if should_be < node.level {
        node.level = should_be;
        if let Some(right) = node.right.as_mut() {
            if should_be < right.level {
                right.level = should_be;
            }
        }
    }

    let mut node = skew(node);
    if let Some(right) = node.right.take() {
        let mut right = skew(right);
        if let Some(right_right) = right.right.take() {
            right.right = Some(skew(right_right));
        }
        node.right = Some(right);
    }

    let mut node = split(node);
    if let Some(right) = node.right.take() {
        node.right = Some(split(right));
    }
    node
}

fn insert<T, F>(link: Link<T>, value: T, cmp: &F) -> (Box<Node<T>>, bool)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut node = match link {
        Some(node) => node,
        None => return (Node::leaf(value), true),
    };

    let inserted = match cmp(&value, &node.value) {
        Ordering::Less => {
            let (left, inserted) = insert(node.left.take(), value, cmp);
            node.left = Some(left);
            inserted
        }
        Ordering::Greater => {
            let (right, inserted) = insert(node.right.take(), value, cmp);
            node.right = Some(right);
            inserted
        }
        Ordering::Equal => false,
    };

    (split(skew(node)), inserted)
}

fn remove_min<T>(mut node: Box<Node<T>>) -> (Link<T>, T) {
    match node.left.take() {
        None => {
            let Node { value, right, .. } = *node;
            (right, value)
        }
        Some(left) => {
            let (left, value) = remove_min(left);
            node.left = left;
            (Some(rebalance(node)), value)
        }
    }
}

fn remove_max<T>(mut node: Box<Node<T>>) -> (Link<T>, T) {
    match node.right.take() {
        None => {
            let Node { value, left, .. } = *node;
            (left, value)
        }
        Some(right) => {
            let (right, value) = remove_max(right);
            node.right = right;
            (Some(rebalance(node)), value)
        }
    }
}

fn remove<T, F>(link: Link<T>, key: &T, cmp: &F) -> (Link<T>, Option<T>)
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut node = match link {
        Some(node) => node,
        None => return (None, None),
    };

    let removed = match cmp(key, &node.value) {
        Ordering::Less => {
            let (left, removed) = remove(node.left.take(), key, cmp);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove(node.right.take(), key, cmp);
            node.right = right;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => return (None, Some(node.value)),
            (None, Some(right)) => {
                let (right, successor) = remove_min(right);
                node.right = right;
                Some(core::mem::replace(&mut node.value, successor))
            }
            (Some(left), right) => {
                node.right = right;
                let (left, predecessor) = remove_max(left);
                node.left = left;
                Some(core::mem::replace(&mut node.value, predecessor))
            }
        },
    };

    if removed.is_some() {
        (Some(rebalance(node)), removed)
    } else {
        (Some(node), None)
    }
}

pub struct AaTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for AaTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AaTree<T> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `value` unless an equal value is already present. Returns true if
    /// the tree changed.
    pub fn insert_by<F>(&mut self, value: T, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let (root, inserted) = insert(self.root.take(), value, &cmp);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes and returns the value equal to `key`.
    pub fn remove_by<F>(&mut self, key: &T, cmp: F) -> Option<T>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let (root, removed) = remove(self.root.take(), key, &cmp);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// The least value.
    pub fn first(&self) -> Option<&T> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = node.left.as_ref() {
            node = left;
        }
        Some(&node.value)
    }

    /// In-order iteration.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Keeps only the values for which `keep` returns true, rebuilding the tree.
    pub fn retain_by<K, F>(&mut self, keep: K, cmp: F)
    where
        K: Fn(&T) -> bool,
        F: Fn(&T, &T) -> Ordering,
    {
        let mut values = Vec::with_capacity(self.len);
        drain_in_order(self.root.take(), &mut values);
        self.len = 0;
        for value in values.into_iter().filter(|v| keep(v)) {
            self.insert_by(value, &cmp);
        }
    }

    /// Checks the AA invariants and the ordering of the values. Panics on failure.
    pub fn check<F>(&self, cmp: F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        fn check_node<T>(node: &Node<T>) -> usize {
            // left child is exactly one level down
            assert_eq!(level(&node.left) + 1, node.level, "bad left level");
            // right child is at most one level down
            let right_level = level(&node.right);
            assert!(right_level == node.level || right_level + 1 == node.level, "bad right level");
            // no two consecutive right horizontal links
            if let Some(right) = node.right.as_ref() {
                assert!(level(&right.right) < node.level, "double horizontal link");
            }
            let mut count = 1;
            if let Some(left) = node.left.as_ref() {
                count += check_node(left);
            }
            if let Some(right) = node.right.as_ref() {
                count += check_node(right);
            }
            count
        }

        let count = self.root.as_ref().map_or(0, |root| check_node(root));
        assert_eq!(count, self.len);

        let values: Vec<&T> = self.iter().collect();
        for w in values.windows(2) {
            assert_eq!(cmp(w[0], w[1]), Ordering::Less, "values out of order");
        }
    }
}

fn drain_in_order<T>(link: Link<T>, out: &mut Vec<T>) {
    if let Some(node) = link {
        let Node {
            value, left, right, ..
        } = *node;
        drain_in_order(left, out);
        out.push(value);
        drain_in_order(right, out);
    }
}

pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.value)
    }
}

impl<T: Debug> Debug for AaTree<T> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> core::fmt::Result {
        fmt.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn insert_and_iterate() {
        let mut tree = AaTree::new();
        for &v in [5, 3, 8, 1, 4, 7, 9, 2, 6].iter() {
            assert!(tree.insert_by(v, natural));
            tree.check(natural);
        }
        assert!(!tree.insert_by(4, natural));
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.first(), Some(&1));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn remove_keeps_invariants() {
        let mut tree = AaTree::new();
        // a scrambled permutation of 0..100
        let values: Vec<i32> = (0..100).map(|i| (i * 37) % 100).collect();
        for &v in values.iter() {
            tree.insert_by(v, natural);
        }
        tree.check(natural);

        for &v in values.iter().filter(|&&v| v % 3 == 0) {
            assert_eq!(tree.remove_by(&v, natural), Some(v));
            tree.check(natural);
        }
        assert_eq!(tree.remove_by(&3, natural), None);
        assert_eq!(tree.len(), 66);
        assert_eq!(tree.first(), Some(&1));
        assert!(tree.iter().all(|v| v % 3 != 0));

        for v in 0..100 {
            tree.remove_by(&v, natural);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.first(), None);
    }

    #[test]
    fn comparator_with_context() {
        // order by distance from a pivot that the caller chooses per operation
        let pivot = 50;
        let by_distance = |a: &i32, b: &i32| {
            (a - pivot).abs().cmp(&(b - pivot).abs()).then(a.cmp(b))
        };
        let mut tree = AaTree::new();
        for &v in [10, 45, 90, 52, 60, 49].iter() {
            tree.insert_by(v, by_distance);
        }
        tree.check(by_distance);
        assert_eq!(tree.first(), Some(&49));
        assert_eq!(tree.remove_by(&49, by_distance), Some(49));
        assert_eq!(tree.first(), Some(&52));
    }

    #[test]
    fn retain_rebuilds() {
        let mut tree = AaTree::new();
        for v in 0..20 {
            tree.insert_by(v, natural);
        }
        tree.retain_by(|v| v % 2 == 1, natural);
        tree.check(natural);
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.first(), Some(&1));
        assert_eq!(format!("{:?}", tree), "[1, 3, 5, 7, 9, 11, 13, 15, 17, 19]");
        tree.clear();
        assert!(tree.is_empty());
    }
}
