use std::{borrow::Borrow, fmt::Debug, mem, ops::Index};

use crate::{
    Cursor, CursorMut, Error, Iter, IterMut, Keys, Map, RBTree, Result, Values, ValuesMut,
};

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Map<K, V> {
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

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    pub fn begin(&self) -> Cursor<'_, K, V> {
        self.tree.front()
    }

    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        self.tree.front_mut()
    }

    pub fn end(&self) -> Cursor<'_, K, V> {
        self.tree.end()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.tree.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        self.tree.values_mut()
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.tree, &mut other.tree);
    }
}

impl<K, V> Map<K, V> {
    /// Inserts the pair unless `key` is already present, in which case the
    /// stored value is left alone and `value` is dropped.
    ///
    /// ```
    /// use arbre::Map;
    ///
    /// let mut map = Map::new();
    /// assert!(map.insert("a", 1).1);
    /// let (cursor, inserted) = map.insert("a", 2);
    /// assert!(!inserted);
    /// assert_eq!(Some(&1), cursor.value());
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool)
    where
        K: Ord,
    {
        let (cursor, inserted) = self.tree.insert_unique(key, value);
        (cursor.into_cursor(), inserted)
    }

    /// [`Map::insert`], reporting allocation failure instead of aborting.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Cursor<'_, K, V>, bool)>
    where
        K: Ord,
    {
        let (cursor, inserted) = self.tree.try_insert_unique(key, value)?;
        Ok((cursor.into_cursor(), inserted))
    }

    /// Inserts the pair, overwriting the value if `key` is present. The flag
    /// tells whether a new entry was created.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor<'_, K, V>, bool)
    where
        K: Ord,
    {
        let (node, inserted) = self.tree.assign_node(key, value);
        (Cursor::new(Some(node), &self.tree), inserted)
    }

    /// Inserts each entry in turn, keeping any existing value, and reports
    /// per entry whether it went in.
    ///
    /// No positions come back: a cursor borrows the whole map, so one per
    /// entry cannot be held at once. Use [`Map::find`] afterwards to get
    /// one.
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<bool>
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| self.tree.insert_unique(key, value).1)
            .collect()
    }

    /// The value under `key`, or [`Error::KeyNotFound`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// The value under `key`, default-constructed and inserted first if the
    /// key is absent.
    ///
    /// ```
    /// use arbre::Map;
    ///
    /// let mut hits = Map::new();
    /// for word in ["a", "b", "a"] {
    ///     *hits.get_or_insert_default(word) += 1;
    /// }
    /// assert_eq!(Ok(&2), hits.at("a"));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        K: Ord,
        V: Default,
    {
        self.tree.get_or_insert_with(key, V::default)
    }

    pub fn try_get_or_insert_default(&mut self, key: K) -> Result<&mut V>
    where
        K: Ord,
        V: Default,
    {
        self.tree.try_get_or_insert_with(key, V::default)
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        self.tree.get_or_insert_with(key, default)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get_key_value(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    /// Removes the entry under `key` and returns its value. An absent key is
    /// a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key)
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.find_mut(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Moves in every entry of `other` whose key is absent here. On a
    /// collision our value wins and the entry stays in `other`.
    pub fn merge(&mut self, other: &mut Self)
    where
        K: Ord,
    {
        self.tree.merge_unique(&mut other.tree);
    }

    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        self.tree.is_valid()
    }
}

impl<K, Q: ?Sized, V> Index<&Q> for Map<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `Map`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Clone, V: Clone> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq> Eq for Map<K, V> {}

impl<K: Debug, V: Debug> Debug for Map<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.tree.fmt(f)
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for Map<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
