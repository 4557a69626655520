use std::{iter::FusedIterator, marker::PhantomData};

use crate::{Node, NodePtr, RBTree};

impl<K, V> RBTree<K, V> {
    /// Gets an iterator over the entries of the tree, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbre::RBTree;
    ///
    /// let mut a = RBTree::new();
    /// a.insert_unique(2, "b");
    /// a.insert_unique(1, "a");
    ///
    /// let entries: Vec<_> = a.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            first: self.first_node(),
            last: self.last_node(),
            len: self.len(),
            _phantom: PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            first: self.first_node(),
            last: self.last_node(),
            len: self.len(),
            _phantom: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbre::RBTree;
    ///
    /// let mut a = RBTree::new();
    /// a.insert_multi(2, "b");
    /// a.insert_multi(1, "a");
    /// a.insert_multi(2, "c");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the tree, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the tree, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbre::RBTree;
    ///
    /// let mut a = RBTree::new();
    /// a.insert_unique(1, String::from("hello"));
    /// a.insert_unique(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"),
    ///                     String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    #[inline]
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    #[inline]
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

pub struct IntoIter<K, V>(RBTree<K, V>);

impl<K, V> IntoIterator for RBTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the tree, sorted by key.
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter(self)
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }

    fn last(mut self) -> Option<(K, V)> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_last()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Walks from both ends towards the middle; `len` tells when the two ends
/// have met.
pub struct Iter<'a, K, V> {
    first: NodePtr<K, V>,
    last: NodePtr<K, V>,
    len: usize,
    _phantom: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V> IntoIterator for &'a RBTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.first.map(|n| {
            self.len -= 1;
            self.first = Node::next(n);
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<(&'a K, &'a V)> {
        self.next_back()
    }

    fn min(mut self) -> Option<(&'a K, &'a V)>
    where
        (&'a K, &'a V): Ord,
    {
        self.next()
    }

    fn max(mut self) -> Option<(&'a K, &'a V)>
    where
        (&'a K, &'a V): Ord,
    {
        self.next_back()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.len == 0 {
            return None;
        }
        self.last.map(|n| {
            self.len -= 1;
            self.last = Node::prev(n);
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            first: self.first,
            last: self.last,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

pub struct IterMut<'a, K, V> {
    first: NodePtr<K, V>,
    last: NodePtr<K, V>,
    len: usize,
    _phantom: PhantomData<(&'a K, &'a mut V)>,
}

impl<'a, K, V> IntoIterator for &'a mut RBTree<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.len == 0 {
            return None;
        }
        self.first.map(|n| {
            self.len -= 1;
            self.first = Node::next(n);
            // SAFETY: values handed out earlier may still be borrowed, so
            // only this node's own fields are borrowed, never the node.
            let n = n.as_ptr();
            unsafe { (&(*n).key, &mut (*n).value) }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<(&'a K, &'a mut V)> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        if self.len == 0 {
            return None;
        }
        self.last.map(|n| {
            self.len -= 1;
            self.last = Node::prev(n);
            let n = n.as_ptr();
            unsafe { (&(*n).key, &mut (*n).value) }
        })
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: Ord, V> Extend<(K, V)> for RBTree<K, V> {
    /// Inserts every pair, duplicates included.
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(move |(k, v)| {
            self.insert_multi(k, v);
        });
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RBTree<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTree<K, V> {
    /// Constructs a `RBTree<K, V>` from an iterator of key-value pairs.
    ///
    /// Every pair is kept; equal keys iterate in the order they came in.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> RBTree<K, V> {
        let mut tree = RBTree::new();
        tree.extend(iter);
        tree
    }
}

/// Builds an adapter that maps each item of an inner entry iterator,
/// forwarding the double-ended, exact-size and fused behavior.
macro_rules! projection {
    (
        $(#[$meta:meta])*
        $name:ident<$($lt:lifetime,)? K, V>($inner:ty) -> $item:ty, |$entry:pat_param| $project:expr
    ) => {
        $(#[$meta])*
        #[must_use = "iterators are lazy and do nothing unless consumed"]
        pub struct $name<$($lt,)? K, V> {
            inner: $inner,
        }

        impl<$($lt,)? K, V> Iterator for $name<$($lt,)? K, V> {
            type Item = $item;

            fn next(&mut self) -> Option<$item> {
                self.inner.next().map(|$entry| $project)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }

            fn last(mut self) -> Option<$item> {
                self.next_back()
            }
        }

        impl<$($lt,)? K, V> DoubleEndedIterator for $name<$($lt,)? K, V> {
            fn next_back(&mut self) -> Option<$item> {
                self.inner.next_back().map(|$entry| $project)
            }
        }

        impl<$($lt,)? K, V> ExactSizeIterator for $name<$($lt,)? K, V> {
            fn len(&self) -> usize {
                self.inner.len()
            }
        }

        impl<$($lt,)? K, V> FusedIterator for $name<$($lt,)? K, V> {}
    };
}

projection! {
    /// Keys of a [`RBTree`] in sorted order, from [`RBTree::keys`].
    Keys<'a, K, V>(Iter<'a, K, V>) -> &'a K, |(k, _)| k
}

projection! {
    /// Values of a [`RBTree`] in key order, from [`RBTree::values`].
    Values<'a, K, V>(Iter<'a, K, V>) -> &'a V, |(_, v)| v
}

projection! {
    /// From [`RBTree::values_mut`].
    ValuesMut<'a, K, V>(IterMut<'a, K, V>) -> &'a mut V, |(_, v)| v
}

projection! {
    /// Owned keys, from [`RBTree::into_keys`].
    IntoKeys<K, V>(IntoIter<K, V>) -> K, |(k, _)| k
}

projection! {
    /// Owned values, from [`RBTree::into_values`].
    IntoValues<K, V>(IntoIter<K, V>) -> V, |(_, v)| v
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::RBTree;
    use pretty_assertions::assert_eq;

    fn sample() -> (RBTree<i32, String>, String, String, String) {
        let mut tree = RBTree::new();
        let zero = "zero".to_string();
        let forty_two = "forty_two".to_string();
        let hundo = "hundo".to_string();

        tree.insert_unique(100, hundo.clone());
        tree.insert_unique(0, zero.clone());
        tree.insert_unique(42, forty_two.clone());
        (tree, zero, forty_two, hundo)
    }

    #[test]
    fn extend() {
        let (mut tree, zero, forty_two, hundo) = sample();
        let one = "one".to_string();
        tree.extend(vec![(1, one.clone())]);

        assert_eq!(4, tree.len());
        let mut iter = tree.iter();
        assert_eq!(Some((&0, &zero)), iter.next());
        assert_eq!(Some((&1, &one)), iter.next());
        assert_eq!(Some((&42, &forty_two)), iter.next());
        assert_eq!(Some((&100, &hundo)), iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn extend_by_reference() {
        let mut tree: RBTree<i32, i32> = RBTree::new();
        let source: RBTree<i32, i32> = (0..4).map(|x| (x, x * x)).collect();
        tree.extend(&source);
        assert_eq!(source, tree);
    }

    #[test]
    fn for_loop() {
        let (tree, ..) = sample();

        for (k, _v) in &tree {
            // This is a test for compilation.
            let _ = k;
        }

        for (_k, v) in tree {
            // This is a test for compilation.
            let _ = v;
        }
    }

    #[test]
    fn into_iter_empty() {
        let tree = RBTree::<usize, ()>::new();
        let vec = tree.into_iter().collect::<Vec<_>>();
        assert_eq!(0, vec.len());
    }

    #[test]
    fn into_iter() {
        let (tree, zero, forty_two, hundo) = sample();
        let vec = tree.into_iter().collect::<Vec<_>>();
        assert_eq!(vec![(0, zero), (42, forty_two), (100, hundo)], vec);
    }

    #[test]
    fn into_iter_both_ends() {
        let tree: RBTree<i32, ()> = (0..5).map(|x| (x, ())).collect();
        let mut iter = tree.into_iter();
        assert_eq!(Some((0, ())), iter.next());
        assert_eq!(Some((4, ())), iter.next_back());
        assert_eq!(3, iter.len());
        assert_eq!(vec![1, 2, 3], iter.map(|(k, _)| k).collect::<Vec<_>>());
    }

    #[test]
    fn iter_empty() {
        let tree = RBTree::<usize, ()>::new();
        assert_eq!(None, tree.iter().next());
        assert_eq!(None, tree.iter().next_back());
    }

    #[test]
    fn iter() {
        let (tree, zero, forty_two, hundo) = sample();
        let mut iter = tree.iter();

        assert_eq!(3, iter.len());
        assert_eq!(Some((&0, &zero)), iter.next());
        assert_eq!(Some((&42, &forty_two)), iter.next());
        assert_eq!(Some((&100, &hundo)), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());

        let mut tree = RBTree::new();
        for i in 0..128 {
            tree.insert_unique(i, ());
        }
        let mut iter = tree.iter();
        for i in 0..128 {
            assert_eq!(Some((&i, &())), iter.next());
        }
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_rev() {
        let mut tree = RBTree::new();
        for i in (0..128).rev() {
            tree.insert_unique(i, ());
        }
        let keys: Vec<_> = tree.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!((0..128).rev().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn iter_ends_meet_in_the_middle() {
        let tree: RBTree<i32, ()> = (0..4).map(|x| (x, ())).collect();
        let mut iter = tree.iter();
        assert_eq!(Some(&0), iter.next().map(|(k, _)| k));
        assert_eq!(Some(&3), iter.next_back().map(|(k, _)| k));
        assert_eq!(Some(&1), iter.next().map(|(k, _)| k));
        assert_eq!(Some(&2), iter.next_back().map(|(k, _)| k));
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());
    }

    #[test]
    fn iter_mut() {
        let (mut tree, mut zero, ..) = sample();
        let stomp = "stomp";

        let mut iter = tree.iter_mut();
        let res = iter.next();
        assert_eq!(Some((&0, &mut zero)), res);
        let res = res.unwrap();
        res.1.push_str(stomp);
        assert_eq!(&format!("{zero}{stomp}"), res.1);
        assert_eq!(Some(&"zerostomp".to_string()), tree.get(&0));
    }

    #[test]
    fn iter_mut_values_stay_writable_after_the_walk() {
        let mut tree: RBTree<i32, i32> = (0..16).map(|k| (k, k)).collect();

        // Every value is held at once while the walk climbs back through
        // the nodes that own them.
        let held: Vec<(&i32, &mut i32)> = tree.iter_mut().collect();
        for (k, v) in held {
            *v += *k * 10;
        }
        let held: Vec<&mut i32> = tree.values_mut().rev().collect();
        for v in held {
            *v += 1;
        }

        assert!(tree.is_valid());
        assert_eq!(
            (0..16).map(|k| (k, k * 11 + 1)).collect::<Vec<_>>(),
            tree.into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn keys_values_and_owning_variants() {
        let (tree, zero, forty_two, hundo) = sample();
        assert_eq!(vec![&0, &42, &100], tree.keys().collect::<Vec<_>>());
        assert_eq!(
            vec![&zero, &forty_two, &hundo],
            tree.values().collect::<Vec<_>>()
        );
        assert_eq!(Some(&100), tree.keys().last());
        assert_eq!(
            vec![0, 42, 100],
            tree.clone().into_keys().collect::<Vec<_>>()
        );
        assert_eq!(
            vec![hundo, forty_two, zero],
            tree.into_values().rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn from_iter_keeps_duplicates() {
        let tree: RBTree<i32, char> = [(2, 'a'), (1, 'b'), (2, 'c')].into_iter().collect();
        assert_eq!(
            vec![(1, 'b'), (2, 'a'), (2, 'c')],
            tree.into_iter().collect::<Vec<_>>()
        );
    }
}
