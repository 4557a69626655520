use std::{borrow::Borrow, cmp::Ordering::*, fmt::Debug, marker::PhantomData, ptr::NonNull};

use crate::{
    Color, Cursor, CursorMut, Direction, Node, NodePtr, NodePtrExt, RBTree, Result, alloc,
};

impl<K, V> Drop for RBTree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Default for RBTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// Public API, no ordering required.
impl<K, V> RBTree<K, V> {
    pub const fn new() -> Self {
        RBTree {
            root: None,
            len: 0,
            marker: PhantomData,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The largest number of elements a tree of this type could hold.
    pub const fn max_size(&self) -> usize {
        alloc::max_nodes::<K, V>()
    }

    /// Removes every node through the regular deletion path, so the tree
    /// stays a valid red-black tree until the last node is gone.
    pub fn clear(&mut self) {
        let count = self.len;
        while let Some(root) = self.root {
            drop(self.erase_node(root));
        }
        if count > 0 {
            log::debug!("clear: dropped {count} nodes");
        }
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|n| {
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|n| {
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first_node()?;
        let Node { key, value, .. } = *self.erase_node(first);
        Some((key, value))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last_node()?;
        let Node { key, value, .. } = *self.erase_node(last);
        Some((key, value))
    }

    /// A cursor on the smallest element, or past the end when empty.
    pub fn front(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.first_node(), self)
    }

    /// A cursor on the largest element, or past the end when empty.
    pub fn back(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.last_node(), self)
    }

    /// The past-the-end cursor.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(None, self)
    }

    pub fn front_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::new(self.first_node(), self)
    }

    pub fn back_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::new(self.last_node(), self)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height<K, V>(node: NodePtr<K, V>) -> usize {
            match node {
                None => 0,
                Some(_) => 1 + height(node.left()).max(height(node.right())),
            }
        }
        height(self.root)
    }

    fn black_height(node: NodePtr<K, V>, parent: NodePtr<K, V>) -> Option<usize> {
        let Some(n) = node else {
            return Some(1);
        };
        let n = unsafe { n.as_ref() };
        if n.parent != parent {
            return None;
        }
        if n.is_red() && (n.left.is_red() || n.right.is_red()) {
            return None;
        }
        let left = Self::black_height(n.left, node)?;
        let right = Self::black_height(n.right, node)?;
        if left != right {
            return None;
        }
        Some(left + usize::from(n.is_black()))
    }
}

// Crate API, no ordering required.
impl<K, V> RBTree<K, V> {
    pub(crate) fn first_node(&self) -> NodePtr<K, V> {
        self.root.map(Node::minimum)
    }

    pub(crate) fn last_node(&self) -> NodePtr<K, V> {
        self.root.map(Node::maximum)
    }

    /// Unlinks `node` and hands its allocation back.
    ///
    /// Only the erased node is invalidated: no key or value moves between
    /// nodes, the others are relinked in place.
    pub(crate) fn erase_node(&mut self, node: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
        let node = self.unlink_node(node);
        // SAFETY: unlink_node detached it; nothing in the tree points at it.
        unsafe { alloc::own_back(node) }
    }

    /// Detaches `node` from the tree and rebalances. The node comes back red
    /// with no links, ready to be linked into another tree.
    pub(crate) fn unlink_node(&mut self, node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
        let z: NodePtr<K, V> = Some(node);
        let z_left = z.left();
        let z_right = z.right();
        let mut removed_color = z.color();
        // x is the node that moves into the removed slot (possibly absent),
        // x_parent its parent once the splice is done.
        let x;
        let x_parent;

        if z_left.is_none() {
            x = z_right;
            x_parent = z.parent();
            self.transplant(z, z_right);
        } else if z_right.is_none() {
            x = z_left;
            x_parent = z.parent();
            self.transplant(z, z_left);
        } else {
            // Two children: the successor y takes z's place and color.
            let y = z_right.map(Node::minimum);
            removed_color = y.color();
            x = y.right();
            if y.parent() == z {
                x_parent = y;
            } else {
                x_parent = y.parent();
                self.transplant(y, x);
                y.set_right(z_right);
                z_right.set_parent(y);
            }
            self.transplant(z, y);
            y.set_left(z_left);
            z_left.set_parent(y);
            y.set_color(z.color());
        }

        self.len -= 1;
        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }
        log::trace!("erase: unlinked node, len = {}", self.len);

        z.set_parent(None);
        z.set_left(None);
        z.set_right(None);
        z.set_color(Color::Red);
        node
    }

    /// Appends a detached node after the current maximum. Callers guarantee
    /// the node's key is not smaller than any key in the tree.
    pub(crate) fn link_last(&mut self, node: NonNull<Node<K, V>>) {
        let new: NodePtr<K, V> = Some(node);
        match self.last_node() {
            None => self.root = new,
            last => {
                new.set_parent(last);
                last.set_right(new);
            }
        }
        self.len += 1;
        self.insert_fixup(node);
    }

    fn replace_child(&mut self, parent: NodePtr<K, V>, old: NodePtr<K, V>, new: NodePtr<K, V>) {
        match parent {
            None => self.root = new,
            Some(_) if parent.left() == old => parent.set_left(new),
            Some(_) => parent.set_right(new),
        }
    }

    /// Puts `new` where `old` hangs from its parent.
    fn transplant(&mut self, old: NodePtr<K, V>, new: NodePtr<K, V>) {
        let parent = old.parent();
        self.replace_child(parent, old, new);
        new.set_parent(parent);
    }

    /// Single rotation pushing `x` down towards `direction`; its child on the
    /// other side takes its place.
    ///
    /// ```text
    ///   x                 y
    ///  / \     Left      / \
    /// a   y    --->     x   c
    ///    / \           / \
    ///   b   c         a   b
    /// ```
    fn rotate(&mut self, x: NodePtr<K, V>, direction: Direction) {
        let y = x.child(direction.opposite());
        debug_assert!(y.is_some(), "rotation without a pivot");
        let inner = y.child(direction);
        x.set_child(direction.opposite(), inner);
        inner.set_parent(x);
        let parent = x.parent();
        y.set_parent(parent);
        self.replace_child(parent, x, y);
        y.set_child(direction, x);
        x.set_parent(y);
    }

    fn insert_fixup(&mut self, node: NonNull<Node<K, V>>) {
        let mut node: NodePtr<K, V> = Some(node);

        // Loop invariant: node is red. A red parent is never the root, so the
        // grandparent exists.
        while node.parent().is_red() {
            let mut parent = node.parent();
            let grandparent = parent.parent();
            let side = if parent == grandparent.left() {
                Direction::Left
            } else {
                Direction::Right
            };
            let uncle = grandparent.child(side.opposite());

            if uncle.is_red() {
                // Case 1 - red uncle: color flip and retry from the
                // grandparent.
                //
                //       G            g
                //      / \          / \
                //     p   u  -->   P   U
                //    /            /
                //   n            n
                parent.set_color(Color::Black);
                uncle.set_color(Color::Black);
                grandparent.set_color(Color::Red);
                node = grandparent;
                continue;
            }

            if node == parent.child(side.opposite()) {
                // Case 2 - black uncle, node is an inner child: rotate at the
                // parent to line the three nodes up.
                //
                //      G             G
                //     / \           / \
                //    p   U  -->    n   U
                //     \           /
                //      n         p
                self.rotate(parent, side);
                node = parent;
                parent = node.parent();
            }

            // Case 3 - black uncle, node is an outer child: rotate at the
            // grandparent. The parent is black afterwards, so we are done.
            //
            //        G           P
            //       / \         / \
            //      p   U  -->  n   g
            //     /                 \
            //    n                   U
            parent.set_color(Color::Black);
            grandparent.set_color(Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        self.root.set_color(Color::Black);
    }

    /// `node` carries one black too few on every path through it; `parent`
    /// is its parent, needed because `node` may be absent.
    fn erase_fixup(&mut self, mut node: NodePtr<K, V>, mut parent: NodePtr<K, V>) {
        while node != self.root && node.is_black() {
            // The deficient side always has a real sibling: its black height
            // is at least one more than node's.
            let side = if node == parent.left() {
                Direction::Left
            } else {
                Direction::Right
            };
            let mut sibling = parent.child(side.opposite());

            if sibling.is_red() {
                // Case 1 - red sibling: rotate at the parent so node gets a
                // black sibling.
                //
                //     P               S
                //    / \             / \
                //   N   s    -->    p   Sr
                //      / \         / \
                //     Sl  Sr      N   Sl
                sibling.set_color(Color::Black);
                parent.set_color(Color::Red);
                self.rotate(parent, side);
                sibling = parent.child(side.opposite());
            }

            let near = sibling.child(side);
            let far = sibling.child(side.opposite());
            if near.is_black() && far.is_black() {
                // Case 2 - sibling color flip, push the deficit up.
                //
                //    (p)           (p)
                //    / \           / \
                //   N   S    -->  N   s
                //      / \           / \
                //     Sl  Sr        Sl  Sr
                sibling.set_color(Color::Red);
                node = parent;
                parent = node.parent();
                continue;
            }

            if far.is_black() {
                // Case 3 - red near nephew: rotate at the sibling so the red
                // one ends up on the far side.
                //
                //   (p)           (p)
                //   / \           / \
                //  N   S    -->  N   sl
                //     / \             \
                //    sl  Sr            S
                //                       \
                //                        Sr
                near.set_color(Color::Black);
                sibling.set_color(Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = parent.child(side.opposite());
            }

            // Case 4 - red far nephew: rotate at the parent and recolor.
            //
            //      (p)             (s)
            //      / \             / \
            //     N   S     -->   P   Sr
            //        / \         / \
            //      (sl) sr      N  (sl)
            sibling.set_color(parent.color());
            parent.set_color(Color::Black);
            sibling.child(side.opposite()).set_color(Color::Black);
            self.rotate(parent, side);
            node = self.root;
            parent = None;
        }

        node.set_color(Color::Black);
    }
}

// Public API, ordered.
impl<K, V> RBTree<K, V> {
    /// A cursor on a node holding `key`, or past the end.
    ///
    /// With duplicate keys any of the matching nodes may be returned; use
    /// [`RBTree::lower_bound`] to get the first one.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.find_node(key), self)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key);
        CursorMut::new(node, self)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| {
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find_node(key)
            .map(|mut n| &mut unsafe { n.as_mut() }.value)
    }

    /// A cursor on the first element whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.lower_bound_node(key), self)
    }

    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let node = self.lower_bound_node(key);
        CursorMut::new(node, self)
    }

    /// A cursor on the first element whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.upper_bound_node(key), self)
    }

    /// `(lower_bound(key), upper_bound(key))`: the half-open run of elements
    /// equal to `key`.
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor<'_, K, V>, Cursor<'_, K, V>)
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of elements equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut count = 0;
        let mut current = self.lower_bound_node(key);
        while let Some(node) = current {
            if key.cmp(unsafe { node.as_ref() }.key.borrow()) != Equal {
                break;
            }
            count += 1;
            current = Node::next(node);
        }
        count
    }

    /// Removes one element equal to `key`, the first in iteration order.
    ///
    /// Removing an absent key is not an error: nothing happens and `None`
    /// comes back.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let node = match self.lower_bound_node(key) {
            Some(node) if key.cmp(unsafe { node.as_ref() }.key.borrow()) == Equal => node,
            _ => {
                log::trace!("remove: key not present, nothing to do");
                return None;
            }
        };
        let Node { key, value, .. } = *self.erase_node(node);
        Some((key, value))
    }

    /// Inserts unconditionally. Equal keys go after the ones already there.
    pub fn insert_multi(&mut self, key: K, value: V) -> CursorMut<'_, K, V>
    where
        K: Ord,
    {
        let node = alloc::leak_alloc_node_or_abort(key, value);
        self.link_node(node);
        CursorMut::new(Some(node), self)
    }

    /// [`RBTree::insert_multi`], reporting allocation failure instead of
    /// aborting. On failure the tree is left untouched.
    pub fn try_insert_multi(&mut self, key: K, value: V) -> Result<CursorMut<'_, K, V>>
    where
        K: Ord,
    {
        let node = alloc::leak_alloc_node(key, value)?;
        self.link_node(node);
        Ok(CursorMut::new(Some(node), self))
    }

    /// Inserts unless an equal key is present. Returns a cursor on the
    /// element holding the key and whether it was inserted; a rejected value
    /// is dropped.
    pub fn insert_unique(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool)
    where
        K: Ord,
    {
        if let Some(existing) = self.find_node(&key) {
            return (CursorMut::new(Some(existing), self), false);
        }
        let node = alloc::leak_alloc_node_or_abort(key, value);
        self.link_node(node);
        (CursorMut::new(Some(node), self), true)
    }

    pub fn try_insert_unique(&mut self, key: K, value: V) -> Result<(CursorMut<'_, K, V>, bool)>
    where
        K: Ord,
    {
        if let Some(existing) = self.find_node(&key) {
            return Ok((CursorMut::new(Some(existing), self), false));
        }
        let node = alloc::leak_alloc_node(key, value)?;
        self.link_node(node);
        Ok((CursorMut::new(Some(node), self), true))
    }

    /// Moves every node of `other` whose key is absent here. Colliding
    /// entries stay in `other`. Returns how many nodes moved.
    pub fn merge_unique(&mut self, other: &mut Self) -> usize
    where
        K: Ord,
    {
        let mut moved = 0;
        let mut current = other.first_node();
        while let Some(node) = current {
            // Unlinking only invalidates `node`, its successor stays put.
            current = Node::next(node);
            if self.find_node(&unsafe { node.as_ref() }.key).is_none() {
                let node = other.unlink_node(node);
                self.link_node(node);
                moved += 1;
            }
        }
        log::debug!("merge: moved {moved} nodes, {} kept by the source", other.len);
        moved
    }

    /// Moves every node of `other` into this tree.
    pub fn merge_multi(&mut self, other: &mut Self) -> usize
    where
        K: Ord,
    {
        let moved = other.len;
        while let Some(first) = other.first_node() {
            let node = other.unlink_node(first);
            self.link_node(node);
        }
        log::debug!("merge: moved {moved} nodes");
        moved
    }

    /// Checks every red-black property, the parent back links and the key
    /// order.
    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        if self.root.is_red() || self.root.parent().is_some() {
            return false;
        }
        if Self::black_height(self.root, None).is_none() {
            return false;
        }
        let mut count = 0;
        let mut previous: Option<&K> = None;
        for (key, _) in self.iter() {
            if previous.is_some_and(|p| p > key) {
                return false;
            }
            previous = Some(key);
            count += 1;
        }
        count == self.len
    }
}

// Crate API, ordered.
impl<K, V> RBTree<K, V> {
    pub(crate) fn find_node<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(candidate) = node {
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(candidate.key.borrow()) {
                Equal => break,
                Greater => node = candidate.right,
                Less => node = candidate.left,
            }
        }
        node
    }

    pub(crate) fn lower_bound_node<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut found = None;
        let mut node = self.root;
        while let Some(candidate) = node {
            let candidate_ref = unsafe { candidate.as_ref() };
            if key.cmp(candidate_ref.key.borrow()) != Greater {
                found = node;
                node = candidate_ref.left;
            } else {
                node = candidate_ref.right;
            }
        }
        found
    }

    pub(crate) fn upper_bound_node<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut found = None;
        let mut node = self.root;
        while let Some(candidate) = node {
            let candidate_ref = unsafe { candidate.as_ref() };
            if key.cmp(candidate_ref.key.borrow()) == Less {
                found = node;
                node = candidate_ref.left;
            } else {
                node = candidate_ref.right;
            }
        }
        found
    }

    /// Links a detached red node and rebalances. Ties descend right.
    pub(crate) fn link_node(&mut self, node: NonNull<Node<K, V>>)
    where
        K: Ord,
    {
        let key = &unsafe { node.as_ref() }.key;
        let mut parent = None;
        let mut direction = Direction::Left;
        let mut current = self.root;
        while let Some(candidate) = current {
            parent = current;
            let candidate = unsafe { candidate.as_ref() };
            if *key < candidate.key {
                direction = Direction::Left;
                current = candidate.left;
            } else {
                direction = Direction::Right;
                current = candidate.right;
            }
        }

        let new: NodePtr<K, V> = Some(node);
        new.set_parent(parent);
        match parent {
            None => self.root = new,
            Some(_) => parent.set_child(direction, new),
        }
        self.len += 1;
        self.insert_fixup(node);
        log::trace!("insert: linked node, len = {}", self.len);
    }

    /// The `operator[]` path of maps: the value under `key`, inserted with
    /// `default` first if the key is absent.
    pub(crate) fn try_get_or_insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V>
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        let mut node = match self.find_node(&key) {
            Some(node) => node,
            None => {
                let node = alloc::leak_alloc_node(key, default())?;
                self.link_node(node);
                node
            }
        };
        Ok(&mut unsafe { node.as_mut() }.value)
    }

    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        K: Ord,
        F: FnOnce() -> V,
    {
        let mut node = match self.find_node(&key) {
            Some(node) => node,
            None => {
                let node = alloc::leak_alloc_node_or_abort(key, default());
                self.link_node(node);
                node
            }
        };
        &mut unsafe { node.as_mut() }.value
    }

    /// Overwrites the value under `key` or inserts it. Returns the node and
    /// whether it is new.
    pub(crate) fn assign_node(&mut self, key: K, value: V) -> (NonNull<Node<K, V>>, bool)
    where
        K: Ord,
    {
        match self.find_node(&key) {
            Some(mut node) => {
                unsafe { node.as_mut() }.value = value;
                (node, false)
            }
            None => {
                let node = alloc::leak_alloc_node_or_abort(key, value);
                self.link_node(node);
                (node, true)
            }
        }
    }
}

impl<K: Clone, V: Clone> Clone for RBTree<K, V> {
    /// Copies in order, appending after the maximum, so duplicates keep their
    /// relative order and a panicking `clone` leaves a valid partial tree to
    /// drop.
    fn clone(&self) -> Self {
        let mut tree = RBTree::new();
        for (k, v) in self.iter() {
            let node = alloc::leak_alloc_node_or_abort(k.clone(), v.clone());
            tree.link_last(node);
        }
        tree
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RBTree<K, V> {}

impl<K: Debug, V: Debug> Debug for RBTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;

    fn keys<K: Clone, V>(tree: &RBTree<K, V>) -> Vec<K> {
        tree.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn tree_ctor_works() {
        let tree = RBTree::<usize, String>::new();
        assert_eq!(None, tree.first_key_value());
        assert_eq!(false, tree.contains_key(&42));
        assert_eq!(0, tree.len());
        assert!(tree.is_empty());
        assert!(tree.is_valid());
        assert_eq!(0, tree.height());
    }

    #[test]
    fn contains_many() {
        let mut tree = RBTree::<usize, String>::new();
        let (_, inserted) = tree.insert_unique(42, "forty two".to_string());
        assert!(inserted);
        assert_eq!(1, tree.len());

        tree.insert_unique(0, "zero".to_string());
        assert_eq!(2, tree.len());
        tree.insert_unique(100, "hundo".to_string());
        assert_eq!(3, tree.len());

        assert_eq!(true, tree.contains_key(&42));
        assert_eq!(true, tree.contains_key(&0));
        assert_eq!(true, tree.contains_key(&100));
        assert_eq!(false, tree.contains_key(&1));
        assert_eq!(false, tree.contains_key(&1000));
    }

    #[test]
    fn insert_unique_rejects_same_key() {
        let mut tree = RBTree::<usize, String>::new();
        tree.insert_unique(42, "forty two".to_string());
        let (cursor, inserted) = tree.insert_unique(42, "42".to_string());
        assert!(!inserted);
        assert_eq!(Some(&"forty two".to_string()), cursor.value());
        assert_eq!(1, tree.len());
    }

    #[test]
    fn insert_multi_keeps_duplicates_in_insertion_order() {
        let mut tree = RBTree::new();
        for (i, k) in [3, 1, 3, 2, 3].into_iter().enumerate() {
            tree.insert_multi(k, i);
        }
        let pairs: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(vec![(1, 1), (2, 3), (3, 0), (3, 2), (3, 4)], pairs);
        assert!(tree.is_valid());
    }

    #[test]
    fn first_and_last() {
        let mut tree = RBTree::<usize, String>::new();
        assert_eq!(None, tree.first_key_value());
        assert_eq!(None, tree.last_key_value());

        let forty_two = "forty two".to_string();
        tree.insert_unique(42, forty_two.clone());
        assert_eq!(Some((&42, &forty_two)), tree.first_key_value());
        assert_eq!(Some((&42, &forty_two)), tree.last_key_value());

        let zero = "zero".to_string();
        let hundo = "hundo".to_string();
        tree.insert_unique(0, zero.clone());
        tree.insert_unique(100, hundo.clone());

        assert_eq!(Some((&0, &zero)), tree.first_key_value());
        assert_eq!(Some((&100, &hundo)), tree.last_key_value());
    }

    #[test]
    fn pop_first_and_last() {
        let mut tree = RBTree::<usize, String>::new();
        assert_eq!(None, tree.pop_first());
        assert_eq!(None, tree.pop_last());

        let zero = "zero".to_string();
        let forty_two = "forty two".to_string();
        let hundo = "hundo".to_string();
        tree.insert_unique(42, forty_two.clone());
        tree.insert_unique(0, zero.clone());
        tree.insert_unique(100, hundo.clone());

        assert_eq!(Some((0, zero)), tree.pop_first());
        assert_eq!(Some((100, hundo)), tree.pop_last());
        assert_eq!(1, tree.len());
        assert!(tree.is_valid());
        assert_eq!(Some((42, forty_two)), tree.pop_first());
        assert_eq!(0, tree.len());
        assert!(tree.root.is_none());
    }

    #[test]
    fn get_and_get_mut() {
        let mut tree = RBTree::new();
        for i in 0..100 {
            tree.insert_unique(i, format!("{i}"));
        }
        assert_eq!(Some(&"42".to_string()), tree.get(&42));
        tree.get_mut(&42).unwrap().push('!');
        assert_eq!(Some((&42, &"42!".to_string())), tree.get_key_value(&42));
        assert_eq!(None, tree.get(&100));
    }

    #[test]
    fn borrowed_lookups() {
        let mut tree = RBTree::new();
        tree.insert_unique("forty two".to_string(), 42);
        assert_eq!(Some(&42), tree.get("forty two"));
        assert!(tree.contains_key("forty two"));
        assert_eq!(Some(("forty two".to_string(), 42)), tree.remove("forty two"));
    }

    #[test]
    fn scenario_insert_and_iterate() {
        let mut tree = RBTree::new();
        for k in [30, 25, 56, 71] {
            tree.insert_unique(k, ());
        }
        assert_eq!(vec![25, 30, 56, 71], keys(&tree));
        assert_eq!(4, tree.len());
        assert!(tree.is_valid());
    }

    #[test]
    fn bounds_and_count_with_duplicates() {
        let mut tree = RBTree::new();
        for k in [1, 2, 3, 3, 3, 3, 4, 5] {
            tree.insert_multi(k, ());
        }
        assert_eq!(4, tree.count(&3));
        assert_eq!(1, tree.count(&1));
        assert_eq!(0, tree.count(&10));

        let mut third = tree.front();
        third.move_next();
        third.move_next();
        assert_eq!(third, tree.lower_bound(&3));

        let mut seventh = tree.front();
        for _ in 0..6 {
            seventh.move_next();
        }
        assert_eq!(seventh, tree.upper_bound(&3));
        assert_eq!(Some(&4), seventh.key());

        let (lower, upper) = tree.equal_range(&3);
        assert_eq!(third, lower);
        assert_eq!(seventh, upper);

        assert!(tree.lower_bound(&6).is_end());
        assert_eq!(tree.front(), tree.lower_bound(&0));
        assert!(tree.upper_bound(&5).is_end());
    }

    #[test]
    fn remove_absent_key_is_a_no_op() {
        let mut tree = RBTree::new();
        for k in 0..10 {
            tree.insert_unique(k, k);
        }
        assert_eq!(None, tree.remove(&42));
        assert_eq!(10, tree.len());
        assert!(tree.is_valid());
    }

    #[test]
    fn remove_root_of_single_node_tree() {
        let mut tree = RBTree::new();
        tree.insert_unique(1, "one");
        assert_eq!(Some((1, "one")), tree.remove(&1));
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        assert!(tree.find(&1).is_end());
        assert!(tree.find(&2).is_end());
    }

    #[test]
    fn remove_takes_first_duplicate() {
        let mut tree = RBTree::new();
        tree.insert_multi(1, "a");
        tree.insert_multi(1, "b");
        tree.insert_multi(0, "z");
        assert_eq!(Some((1, "a")), tree.remove(&1));
        assert_eq!(Some((1, "b")), tree.remove(&1));
        assert_eq!(None, tree.remove(&1));
        assert_eq!(1, tree.len());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RBTree::new();
        for k in 0..1000 {
            tree.insert_unique(k, ());
            assert!(tree.is_valid());
        }
        let bound = 2.0 * ((tree.len() + 1) as f64).log2();
        assert!((tree.height() as f64) <= bound, "height {}", tree.height());
        assert_eq!((0..1000).collect::<Vec<_>>(), keys(&tree));
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = RBTree::new();
        for k in (0..1000).rev() {
            tree.insert_unique(k, ());
        }
        assert!(tree.is_valid());
        let bound = 2.0 * ((tree.len() + 1) as f64).log2();
        assert!((tree.height() as f64) <= bound);
    }

    #[test]
    fn shuffled_erase_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut input: Vec<u32> = (0..512).collect();
        input.shuffle(&mut rng);

        let mut tree = RBTree::new();
        for &k in &input {
            tree.insert_unique(k, k * 2);
        }
        assert!(tree.is_valid());

        input.shuffle(&mut rng);
        for (i, k) in input.iter().enumerate() {
            assert_eq!(Some((*k, k * 2)), tree.remove(k));
            assert_eq!(input.len() - i - 1, tree.len());
            assert!(tree.is_valid());
        }
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
    }

    #[test]
    fn random_mixed_operations_keep_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut tree = RBTree::new();
        let mut reference = std::collections::BTreeMap::new();
        for _ in 0..4000 {
            let key: u16 = rng.random_range(0..256);
            if rng.random_bool(0.6) {
                let (_, inserted) = tree.insert_unique(key, key);
                assert_eq!(inserted, reference.insert(key, key).is_none());
            } else {
                assert_eq!(reference.remove(&key), tree.remove(&key).map(|(_, v)| v));
            }
        }
        assert!(tree.is_valid());
        assert_eq!(reference.keys().copied().collect::<Vec<_>>(), keys(&tree));
    }

    #[test]
    fn search_does_not_mutate() {
        let mut tree = RBTree::new();
        for k in [8, 4, 12, 2, 6, 10, 14] {
            tree.insert_unique(k, ());
        }
        let before = format!("{:?}", tree.root.map(|n| unsafe { n.as_ref() }.key));
        for _ in 0..3 {
            assert_eq!(Some(&6), tree.find(&6).key());
            assert!(tree.find(&7).is_end());
        }
        let after = format!("{:?}", tree.root.map(|n| unsafe { n.as_ref() }.key));
        assert_eq!(before, after);
        assert_eq!(7, tree.len());
    }

    #[test]
    fn clone_and_eq() {
        let mut tree = RBTree::new();
        for (i, k) in [5, 1, 5, 3, 9].into_iter().enumerate() {
            tree.insert_multi(k, i);
        }
        let copy = tree.clone();
        assert!(copy.is_valid());
        assert_eq!(tree, copy);

        let mut other = copy.clone();
        other.remove(&9);
        assert!(tree != other);
        other.insert_multi(9, 0);
        assert!(tree != other);
    }

    #[test]
    fn clear_leaves_empty_tree() {
        let mut tree = RBTree::new();
        for k in 0..100 {
            tree.insert_unique(k, k.to_string());
        }
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        tree.insert_unique(1, "1".to_string());
        assert_eq!(1, tree.len());
    }

    #[test]
    fn merge_unique_keeps_existing() {
        let mut left = RBTree::new();
        let mut right = RBTree::new();
        for k in [1, 3, 5] {
            left.insert_unique(k, "left");
        }
        for k in [2, 3, 4] {
            right.insert_unique(k, "right");
        }
        assert_eq!(2, left.merge_unique(&mut right));
        assert_eq!(5, left.len());
        assert_eq!(Some(&"left"), left.get(&3));
        assert_eq!(vec![3], keys(&right));
        assert!(left.is_valid());
        assert!(right.is_valid());
    }

    #[test]
    fn merge_multi_moves_everything() {
        let mut left = RBTree::new();
        let mut right = RBTree::new();
        for k in [1, 3] {
            left.insert_multi(k, ());
        }
        for k in [3, 2] {
            right.insert_multi(k, ());
        }
        assert_eq!(2, left.merge_multi(&mut right));
        assert_eq!(vec![1, 2, 3, 3], keys(&left));
        assert!(right.is_empty());
        assert!(left.is_valid());
    }

    #[test]
    fn try_insert_succeeds() {
        let mut tree = RBTree::new();
        assert!(tree.try_insert_multi(1, ()).is_ok());
        let (_, inserted) = tree.try_insert_unique(1, ()).unwrap();
        assert!(!inserted);
        assert_eq!(1, tree.len());
    }

    #[test]
    fn max_size_is_positive() {
        let tree = RBTree::<u64, u64>::new();
        assert!(tree.max_size() > 1 << 20);
    }

    #[test]
    fn debug_prints_as_map() {
        let mut tree = RBTree::new();
        tree.insert_unique(2, "b");
        tree.insert_unique(1, "a");
        assert_eq!(r#"{1: "a", 2: "b"}"#, format!("{tree:?}"));
    }
}
