use std::{borrow::Borrow, fmt::Debug, mem};

use crate::{Keys, MultiSet, RBTree, Result, SetCursor, SetCursorMut};

impl<T> Default for MultiSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MultiSet<T> {
    pub const fn new() -> Self {
        Self {
            tree: RBTree::new(),
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

    pub fn begin(&self) -> SetCursor<'_, T> {
        SetCursor(self.tree.front())
    }

    pub fn begin_mut(&mut self) -> SetCursorMut<'_, T> {
        SetCursorMut(self.tree.front_mut())
    }

    pub fn end(&self) -> SetCursor<'_, T> {
        SetCursor(self.tree.end())
    }

    /// Elements in order; equal elements come out in insertion order.
    pub fn iter(&self) -> Keys<'_, T, ()> {
        self.tree.keys()
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.tree, &mut other.tree);
    }
}

impl<T> MultiSet<T> {
    /// Adds `value` after any equal elements. Never rejects.
    pub fn insert(&mut self, value: T) -> SetCursor<'_, T>
    where
        T: Ord,
    {
        SetCursor(self.tree.insert_multi(value, ()).into_cursor())
    }

    pub fn try_insert(&mut self, value: T) -> Result<SetCursor<'_, T>>
    where
        T: Ord,
    {
        let cursor = self.tree.try_insert_multi(value, ())?;
        Ok(SetCursor(cursor.into_cursor()))
    }

    /// Inserts every value and returns how many went in. Every value is
    /// accepted, so that is the number of values consumed.
    pub fn insert_many<I>(&mut self, values: I) -> usize
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        let mut inserted = 0;
        for value in values {
            self.tree.insert_multi(value, ());
            inserted += 1;
        }
        inserted
    }

    /// Removes one element equal to `value`, the earliest inserted.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).is_some()
    }

    /// Removes every element equal to `value` and returns how many went.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut removed = 0;
        while self.tree.remove(value).is_some() {
            removed += 1;
        }
        removed
    }

    /// A cursor on some element equal to `value`; see
    /// [`MultiSet::lower_bound`] for the first one.
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

    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.count(value)
    }

    /// The first element not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> SetCursor<'_, T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        SetCursor(self.tree.lower_bound(value))
    }

    pub fn lower_bound_mut<Q>(&mut self, value: &Q) -> SetCursorMut<'_, T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        SetCursorMut(self.tree.lower_bound_mut(value))
    }

    /// The first element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> SetCursor<'_, T>
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        SetCursor(self.tree.upper_bound(value))
    }

    pub fn equal_range<Q>(&self, value: &Q) -> (SetCursor<'_, T>, SetCursor<'_, T>)
    where
        T: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let (lower, upper) = self.tree.equal_range(value);
        (SetCursor(lower), SetCursor(upper))
    }

    /// Moves every element of `other` in; `other` ends up empty.
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.tree.merge_multi(&mut other.tree);
    }

    pub fn is_valid(&self) -> bool
    where
        T: Ord,
    {
        self.tree.is_valid()
    }
}

impl<T: Clone> Clone for MultiSet<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for MultiSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for MultiSet<T> {}

impl<T: Debug> Debug for MultiSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for MultiSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}
