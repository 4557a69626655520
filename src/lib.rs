//! Ordered containers on top of a red-black tree.
//!
//! [`RBTree`] is the engine: it owns its nodes, keeps them balanced and hands
//! out [`Cursor`]s that walk the tree through parent links. [`Set`],
//! [`MultiSet`] and [`Map`] wrap one tree each and only decide what to do
//! with duplicate keys.
mod alloc;
mod cursor;
mod error;
mod iter;
mod map;
mod multiset;
mod node;
mod set;
mod tree;

use std::{marker::PhantomData, ptr::NonNull};

pub use cursor::{Cursor, CursorMut};
pub use error::{Error, Result};
pub use iter::tree::{IntoIter, IntoKeys, IntoValues, Iter, IterMut, Keys, Values, ValuesMut};
pub use set::{SetCursor, SetCursorMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red = 0,
    Black = 1,
}

/// Which side of its parent a node hangs from, or which way a rotation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline(always)]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A link to a node. `None` is both the absent child and the past-the-end
/// position of a cursor.
pub(crate) type NodePtr<K, V> = Option<NonNull<Node<K, V>>>;

pub(crate) trait NodePtrExt: Copy {
    type Key;
    type Value;

    fn color(self) -> Color;
    fn is_black(self) -> bool;
    fn is_red(self) -> bool;
    fn child(self, direction: Direction) -> NodePtr<Self::Key, Self::Value>;
    fn left(self) -> NodePtr<Self::Key, Self::Value>;
    fn parent(self) -> NodePtr<Self::Key, Self::Value>;
    fn right(self) -> NodePtr<Self::Key, Self::Value>;
    fn set_child(self, direction: Direction, child: NodePtr<Self::Key, Self::Value>);
    fn set_color(self, color: Color);
    fn set_left(self, left: NodePtr<Self::Key, Self::Value>);
    fn set_parent(self, parent: NodePtr<Self::Key, Self::Value>);
    fn set_right(self, right: NodePtr<Self::Key, Self::Value>);
}

// Every accessor treats `None` as a black leaf; every setter on `None` is a
// no-op. The tree only ever stores pointers to live nodes it allocated, which
// is what makes the dereferences below sound. Each one goes through a raw
// field projection, so no reference to a whole node is created.
impl<K, V> NodePtrExt for NodePtr<K, V> {
    type Key = K;
    type Value = V;

    #[inline(always)]
    fn color(self) -> Color {
        self.map_or(Color::Black, |v| unsafe { (*v.as_ptr()).color })
    }

    #[inline(always)]
    fn is_black(self) -> bool {
        self.color() == Color::Black
    }

    #[inline(always)]
    fn is_red(self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    fn child(self, direction: Direction) -> NodePtr<K, V> {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }

    #[inline(always)]
    fn left(self) -> NodePtr<K, V> {
        self.and_then(|v| unsafe { (*v.as_ptr()).left })
    }

    #[inline(always)]
    fn parent(self) -> NodePtr<K, V> {
        self.and_then(|v| unsafe { (*v.as_ptr()).parent })
    }

    #[inline(always)]
    fn right(self) -> NodePtr<K, V> {
        self.and_then(|v| unsafe { (*v.as_ptr()).right })
    }

    #[inline(always)]
    fn set_child(self, direction: Direction, child: NodePtr<K, V>) {
        match direction {
            Direction::Left => self.set_left(child),
            Direction::Right => self.set_right(child),
        }
    }

    #[inline(always)]
    fn set_color(self, color: Color) {
        if let Some(node) = self {
            unsafe { (*node.as_ptr()).color = color };
        }
    }

    #[inline(always)]
    fn set_left(self, left: NodePtr<K, V>) {
        if let Some(node) = self {
            unsafe { (*node.as_ptr()).left = left };
        }
    }

    #[inline(always)]
    fn set_parent(self, parent: NodePtr<K, V>) {
        if let Some(node) = self {
            unsafe { (*node.as_ptr()).parent = parent };
        }
    }

    #[inline(always)]
    fn set_right(self, right: NodePtr<K, V>) {
        if let Some(node) = self {
            unsafe { (*node.as_ptr()).right = right };
        }
    }
}

/// A tree node. The key never changes once the node is built; rotations and
/// fix-ups only touch the links and the color.
pub(crate) struct Node<K, V> {
    pub(crate) parent: NodePtr<K, V>,
    pub(crate) left: NodePtr<K, V>,
    pub(crate) right: NodePtr<K, V>,
    pub(crate) color: Color,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// A red-black tree.
///
/// Duplicate keys are allowed at this level: ties descend to the right, so
/// equal keys iterate in insertion order. The adapters decide whether a
/// duplicate is welcome.
pub struct RBTree<K, V> {
    root: NodePtr<K, V>,
    len: usize,
    marker: PhantomData<Box<Node<K, V>>>,
}

/// An ordered set of unique elements.
pub struct Set<T> {
    tree: RBTree<T, ()>,
}

/// An ordered set that keeps every inserted element, duplicates included.
pub struct MultiSet<T> {
    tree: RBTree<T, ()>,
}

/// An ordered map with unique keys.
pub struct Map<K, V> {
    tree: RBTree<K, V>,
}
