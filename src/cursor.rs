//! Positions inside a tree.
//!
//! A cursor points either at a node or at the "ghost" position past the end.
//! Moving computes the successor or predecessor by walking child and parent
//! links; nothing about the traversal order is cached, so a cursor only
//! needs the node it sits on to stay alive.
use std::{fmt::Debug, ptr};

use crate::{Error, Node, NodePtr, RBTree, Result};

/// A read-only cursor over a [`RBTree`].
pub struct Cursor<'a, K, V> {
    current: NodePtr<K, V>,
    tree: &'a RBTree<K, V>,
}

/// A cursor that can modify values and erase the element it points at.
pub struct CursorMut<'a, K, V> {
    current: NodePtr<K, V>,
    tree: &'a mut RBTree<K, V>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(current: NodePtr<K, V>, tree: &'a RBTree<K, V>) -> Self {
        Cursor { current, tree }
    }

    /// Whether the cursor sits past the end.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn key(&self) -> Option<&'a K> {
        self.node().map(|n| &n.key)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.node().map(|n| &n.value)
    }

    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.node().map(|n| (&n.key, &n.value))
    }

    /// Moves to the successor. Past the last element the cursor reaches the
    /// end; from the end it wraps to the first element.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => Node::next(node),
            None => self.tree.first_node(),
        };
    }

    /// Moves to the predecessor. Before the first element the cursor reaches
    /// the end; from the end it wraps to the last element.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => Node::prev(node),
            None => self.tree.last_node(),
        };
    }

    /// The element [`Cursor::move_next`] would land on.
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        let mut next = *self;
        next.move_next();
        next.key_value()
    }

    /// The element [`Cursor::move_prev`] would land on.
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        let mut prev = *self;
        prev.move_prev();
        prev.key_value()
    }

    fn node(&self) -> Option<&'a Node<K, V>> {
        // SAFETY: the shared borrow of the tree keeps every node alive and
        // unmodified for 'a.
        self.current.map(|n| unsafe { n.as_ref() })
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

/// Two cursors are equal when they sit on the same node of the same tree.
/// Keys are never compared.
impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current && ptr::eq(self.tree, other.tree)
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: Debug, V: Debug> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(current: NodePtr<K, V>, tree: &'a mut RBTree<K, V>) -> Self {
        CursorMut { current, tree }
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn key(&self) -> Option<&K> {
        self.current.map(|n| &unsafe { n.as_ref() }.key)
    }

    pub fn value(&self) -> Option<&V> {
        self.current.map(|n| &unsafe { n.as_ref() }.value)
    }

    /// The value under the cursor. Keys stay immutable: changing one would
    /// break the ordering.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        // SAFETY: the exclusive borrow of the tree makes this the only live
        // access path to the node. Only the value field is borrowed.
        self.current.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        self.current.map(|n| {
            let n = n.as_ptr();
            unsafe { (&(*n).key, &mut (*n).value) }
        })
    }

    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => Node::next(node),
            None => self.tree.first_node(),
        };
    }

    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => Node::prev(node),
            None => self.tree.last_node(),
        };
    }

    /// Erases the element under the cursor and moves to its successor.
    ///
    /// Only that element is invalidated. Fails with [`Error::OutOfRange`]
    /// when the cursor is past the end.
    pub fn remove_current(&mut self) -> Result<(K, V)> {
        let node = self.current.ok_or(Error::OutOfRange)?;
        self.current = Node::next(node);
        let Node { key, value, .. } = *self.tree.erase_node(node);
        Ok((key, value))
    }

    /// A read-only view for the duration of the borrow.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.current, self.tree)
    }

    pub fn into_cursor(self) -> Cursor<'a, K, V> {
        Cursor::new(self.current, self.tree)
    }
}

impl<K: Debug, V: Debug> Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.as_cursor().key_value())
            .finish()
    }
}
