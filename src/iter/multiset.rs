use crate::{IntoKeys, Keys, MultiSet};

impl<T: Ord> FromIterator<T> for MultiSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> MultiSet<T> {
        let mut set = MultiSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for MultiSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for MultiSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.insert_many(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a MultiSet<T> {
    type Item = &'a T;
    type IntoIter = Keys<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for MultiSet<T> {
    type Item = T;
    type IntoIter = IntoKeys<T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_keys()
    }
}
