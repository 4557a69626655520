//! Every container against the std ordered collections, driven by arbitrary
//! insert/remove sequences.
use std::collections::{BTreeMap, BTreeSet};

use arbre::{Map, MultiSet, RBTree, Set};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn height_is_logarithmic<K, V>(tree: &RBTree<K, V>) -> bool {
    let bound = 2.0 * ((tree.len() + 1) as f64).log2();
    tree.height() as f64 <= bound
}

#[quickcheck]
fn set_matches_btreeset(ops: Vec<(bool, u8)>) -> bool {
    let mut set = Set::new();
    let mut model = BTreeSet::new();

    for (insert, k) in ops {
        let ok = if insert {
            set.insert(k).1 == model.insert(k)
        } else {
            set.remove(&k) == model.remove(&k)
        };
        if !ok || !set.is_valid() || set.len() != model.len() {
            return false;
        }
    }

    set.iter().eq(model.iter())
}

#[quickcheck]
fn multiset_matches_counted_btreemap(ops: Vec<(bool, u8)>) -> bool {
    let mut set = MultiSet::new();
    let mut model: BTreeMap<u8, usize> = BTreeMap::new();

    for (insert, k) in ops {
        if insert {
            set.insert(k);
            *model.entry(k).or_default() += 1;
        } else {
            let expected = match model.get(&k).copied() {
                None => false,
                Some(1) => model.remove(&k).is_some(),
                Some(n) => model.insert(k, n - 1).is_some(),
            };
            if set.remove(&k) != expected {
                return false;
            }
        }
        if !set.is_valid() {
            return false;
        }
    }

    let flattened: Vec<u8> = model
        .iter()
        .flat_map(|(k, n)| std::iter::repeat_n(*k, *n))
        .collect();
    model.iter().all(|(k, n)| set.count(k) == *n) && set.into_iter().eq(flattened)
}

#[quickcheck]
fn map_matches_btreemap(entries: Vec<(u16, u32)>, removals: Vec<u16>) -> bool {
    let mut map = Map::new();
    let mut model = BTreeMap::new();

    for (k, v) in entries {
        let (_, inserted) = map.insert(k, v);
        if inserted != !model.contains_key(&k) {
            return false;
        }
        model.entry(k).or_insert(v);
    }
    for k in removals {
        if map.remove(&k) != model.remove(&k) {
            return false;
        }
        if map.at(&k).is_ok() {
            return false;
        }
    }

    map.is_valid() && map.iter().eq(model.iter())
}

#[quickcheck]
fn insert_then_erase_everything(mut keys: Vec<u32>, order: Vec<usize>) -> TestResult {
    if keys.is_empty() {
        return TestResult::discard();
    }

    let mut tree = RBTree::new();
    for k in keys.iter().copied() {
        tree.insert_multi(k, ());
    }
    if !tree.is_valid() || !height_is_logarithmic(&tree) {
        return TestResult::failed();
    }

    for i in order {
        if keys.is_empty() {
            break;
        }
        let k = keys.swap_remove(i % keys.len());
        if tree.remove(&k).is_none() {
            return TestResult::failed();
        }
    }
    for k in keys.drain(..) {
        if tree.remove(&k).is_none() {
            return TestResult::failed();
        }
    }

    TestResult::from_bool(tree.is_empty() && tree.is_valid() && tree.front().is_end())
}

#[quickcheck]
fn bounds_match_btreeset_ranges(values: Vec<u8>, probe: u8) -> bool {
    let set: MultiSet<u8> = values.iter().copied().collect();
    let model: Vec<u8> = {
        let mut sorted = values.clone();
        sorted.sort();
        sorted
    };

    let lower = model.iter().position(|v| *v >= probe);
    let upper = model.iter().position(|v| *v > probe);
    set.lower_bound(&probe).get() == lower.map(|i| &model[i])
        && set.upper_bound(&probe).get() == upper.map(|i| &model[i])
        && set.count(&probe) == upper.unwrap_or(model.len()) - lower.unwrap_or(model.len())
}

#[quickcheck]
fn cursor_walk_matches_iteration(values: Vec<i16>) -> bool {
    let set: Set<i16> = values.into_iter().collect();

    let mut forward = Vec::new();
    let mut cursor = set.begin();
    while let Some(v) = cursor.get() {
        forward.push(*v);
        cursor.move_next();
    }

    let mut backward = Vec::new();
    let mut cursor = set.end();
    cursor.move_prev();
    while let Some(v) = cursor.get() {
        backward.push(*v);
        cursor.move_prev();
    }
    backward.reverse();

    forward == backward && set.iter().copied().eq(forward)
}
