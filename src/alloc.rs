use std::{alloc::Layout, ptr::NonNull};

use crate::{Error, Node, Result};

/// Allocates a detached red node.
///
/// The node is leaked until it is handed to [`own_back`].
pub(crate) fn leak_alloc_node<K, V>(key: K, value: V) -> Result<NonNull<Node<K, V>>> {
    // SAFETY: Node always carries three links and a color, so the layout is
    // never zero-sized.
    let raw = unsafe { std::alloc::alloc(Layout::new::<Node<K, V>>()) } as *mut Node<K, V>;
    let node = NonNull::new(raw).ok_or(Error::AllocationFailure)?;
    // SAFETY: freshly allocated with the layout of Node<K, V>.
    unsafe { node.as_ptr().write(Node::new(key, value)) };
    Ok(node)
}

/// Same as [`leak_alloc_node`], but allocation failure goes through
/// [`std::alloc::handle_alloc_error`] the way std collections do.
pub(crate) fn leak_alloc_node_or_abort<K, V>(key: K, value: V) -> NonNull<Node<K, V>> {
    match leak_alloc_node(key, value) {
        Ok(node) => node,
        Err(_) => std::alloc::handle_alloc_error(Layout::new::<Node<K, V>>()),
    }
}

/// # Safety
///
/// `node` must come from [`leak_alloc_node`] and must no longer be reachable
/// from any tree.
pub(crate) unsafe fn own_back<K, V>(node: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
    // SAFETY: allocated by the global allocator with Layout::new::<Node<K, V>>,
    // which is exactly what Box expects.
    unsafe { Box::from_raw(node.as_ptr()) }
}

/// The largest node count the address space can hold.
pub(crate) const fn max_nodes<K, V>() -> usize {
    isize::MAX as usize / std::mem::size_of::<Node<K, V>>()
}
