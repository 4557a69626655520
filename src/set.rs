use std::{borrow::Borrow, fmt::Debug, mem};

use crate::{Cursor, CursorMut, Keys, Result, Set};

/// A read-only position in a [`Set`] or [`crate::MultiSet`].
pub struct SetCursor<'a, T>(pub(crate) Cursor<'a, T, ()>);

/// A position in a [`Set`] or [`crate::MultiSet`] that can erase the element
/// it points at.
pub struct SetCursorMut<'a, T>(pub(crate) CursorMut<'a, T, ()>);

impl<'a, T> SetCursor<'a, T> {
    pub fn get(&self) -> Option<&'a T> {
        self.0.key()
    }

    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    pub fn move_next(&mut self) {
        self.0.move_next();
    }

    pub fn move_prev(&mut self) {
        self.0.move_prev();
    }

    pub fn peek_next(&self) -> Option<&'a T> {
        self.0.peek_next().map(|(k, _)| k)
    }

    pub fn peek_prev(&self) -> Option<&'a T> {
        self.0.peek_prev().map(|(k, _)| k)
    }
}

impl<T> Clone for SetCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SetCursor<'_, T> {}

impl<T> PartialEq for SetCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for SetCursor<'_, T> {}

impl<T: Debug> Debug for SetCursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SetCursor").field(&self.get()).finish()
    }
}

impl<'a, T> SetCursorMut<'a, T> {
    pub fn get(&self) -> Option<&T> {
        self.0.key()
    }

    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    pub fn move_next(&mut self) {
        self.0.move_next();
    }

    pub fn move_prev(&mut self) {
        self.0.move_prev();
    }

    /// Erases the element under the cursor and moves to its successor.
    /// Fails with [`crate::Error::OutOfRange`] past the end.
    pub fn remove_current(&mut self) -> Result<T> {
        self.0.remove_current().map(|(k, ())| k)
    }

    pub fn as_cursor(&self) -> SetCursor<'_, T> {
        SetCursor(self.0.as_cursor())
    }

    pub fn into_cursor(self) -> SetCursor<'a, T> {
        SetCursor(self.0.into_cursor())
    }
}

impl<T: Debug> Debug for SetCursorMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SetCursorMut").field(&self.get()).finish()
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Set<T> {
    pub const fn new() -> Self {
        Self {
            tree: crate::RBTree::new(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    pub const fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last().map(|(k, _)| k)
    }

    /// A cursor on the smallest element.
    pub fn begin(&self) -> SetCursor<'_, T> {
        SetCursor(self.tree.front())
    }

    pub fn begin_mut(&mut self) -> SetCursorMut<'_, T> {
        SetCursorMut(self.tree.front_mut())
    }

    pub fn end(&self) -> SetCursor<'_, T> {
        SetCursor(self.tree.end())
    }

    pub fn iter(&self) -> Keys<'_, T, ()> {
        self.tree.keys()
    }

    /// Exchanges the contents of two sets. No element moves in memory.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.tree, &mut other.tree);
    }
}

impl<T> Set<T> {
    /// Adds `value` unless an equal element is present. The cursor points at
    /// the element that ends up holding the value; the flag tells whether it
    /// is the new one.
    ///
    /// ```
    /// use arbre::Set;
    ///
    /// let mut set = Set::new();
    /// assert!(set.insert(3).1);
    /// let (cursor, inserted) = set.insert(3);
    /// assert!(!inserted);
    /// assert_eq!(Some(&3), cursor.get());
    /// ```
    pub fn insert(&mut self, value: T) -> (SetCursor<'_, T>, bool)
    where
        T: Ord,
    {
        let (cursor, inserted) = self.tree.insert_unique(value, ());
        (SetCursor(cursor.into_cursor()), inserted)
    }

    /// [`Set::insert`], reporting allocation failure instead of aborting.
    pub fn try_insert(&mut self, value: T) -> Result<(SetCursor<'_, T>, bool)>
    where
        T: Ord,
    {
        let (cursor, inserted) = self.tree.try_insert_unique(value, ())?;
        Ok((SetCursor(cursor.into_cursor()), inserted))
    }

    /// Inserts each value in turn and reports, per value, whether it went in.
    ///
    /// No positions come back: a cursor borrows the whole set, so one per
    /// value cannot be held at once. Use [`Set::find`] afterwards to get
    /// one.
    pub fn insert_many<I>(&mut self, values: I) -> Vec<bool>
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .map(|value| self.tree.insert_unique(value, ()).1)
            .collect()
    }

    /// Removes the element equal to `value`. An absent value is not an
    /// error, `false` comes back.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).is_some()
    }

    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).map(|(k, _)| k)
    }

    pub fn find<Q>(&self, value: &Q) -> SetCursor<'_, T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        SetCursor(self.tree.find(value))
    }

    pub fn find_mut<Q>(&mut self, value: &Q) -> SetCursorMut<'_, T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        SetCursorMut(self.tree.find_mut(value))
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(value)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get_key_value(value).map(|(k, _)| k)
    }

    /// Moves in every element of `other` not already present. Elements equal
    /// to one of ours stay behind in `other`.
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.tree.merge_unique(&mut other.tree);
    }

    pub fn is_valid(&self) -> bool
    where
        T: Ord,
    {
        self.tree.is_valid()
    }
}

impl<T: Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for Set<T> {}

impl<T: Debug> Debug for Set<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}
