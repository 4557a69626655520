use std::{fmt::Debug, ptr::NonNull};

use super::{Color, Node, NodePtr, NodePtrExt};

impl<K, V> Node<K, V> {
    /// A detached red node, the state every insertion starts from.
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            key,
            value,
        }
    }

    #[inline(always)]
    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline(always)]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

// Navigation works on raw pointers and reads one link field at a time. A
// `&Node` here would cover the value too, and mutable iterators may have
// lent that value out while the walk climbs back through its node.
impl<K, V> Node<K, V> {
    /// The in-order successor, or `None` past the last node.
    #[inline(always)]
    pub(crate) fn next(node: NonNull<Node<K, V>>) -> NodePtr<K, V> {
        let node: NodePtr<K, V> = Some(node);
        if let Some(right) = node.right() {
            return Some(Node::minimum(right));
        }
        // Climb while we hang from a right link. The first ancestor entered
        // from its left side holds the next key; running out of ancestors
        // means this was the maximum.
        let mut child = node;
        let mut parent = node.parent();
        while parent.is_some() && parent.right() == child {
            child = parent;
            parent = parent.parent();
        }
        parent
    }

    /// The in-order predecessor, or `None` before the first node.
    #[inline(always)]
    pub(crate) fn prev(node: NonNull<Node<K, V>>) -> NodePtr<K, V> {
        let node: NodePtr<K, V> = Some(node);
        if let Some(left) = node.left() {
            return Some(Node::maximum(left));
        }
        let mut child = node;
        let mut parent = node.parent();
        while parent.is_some() && parent.left() == child {
            child = parent;
            parent = parent.parent();
        }
        parent
    }

    /// Leftmost node of the subtree rooted at `node`.
    #[inline(always)]
    pub(crate) fn minimum(mut node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
        while let Some(left) = Some(node).left() {
            node = left;
        }
        node
    }

    /// Rightmost node of the subtree rooted at `node`.
    #[inline(always)]
    pub(crate) fn maximum(mut node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
        while let Some(right) = Some(node).right() {
            node = right;
        }
        node
    }
}

impl<K, V> Debug for Node<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:?}::({:?},{:?})",
            self.color, self.key, self.value
        ))
    }
}
