mod map;
mod multiset;
mod set;
pub(crate) mod tree;
