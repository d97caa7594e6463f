//! Edit-script computation and application.

use std::collections::{HashMap, HashSet};

use crate::DiffItem;

/// One operation of an edit script.
///
/// Scripts use batch semantics: [`ListEdit::Delete`] indices and
/// [`ListEdit::Move`] `from` indices address the old list, while
/// [`ListEdit::Insert`] indices, `Move` `to` indices, and
/// [`ListEdit::Update`] indices address the new list. [`apply`] resolves
/// them in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEdit<T> {
    /// A new item appears at `index` in the new list.
    Insert { index: usize, item: T },
    /// The item at `index` in the old list is gone.
    Delete { index: usize },
    /// A surviving item changed relative position.
    Move { from: usize, to: usize },
    /// A surviving item changed visible content.
    Update { index: usize, item: T },
}

/// Computes the edit script transforming `old` into `new`.
///
/// Items are matched by stable id. Surviving items that keep their relative
/// order are left untouched; the rest become moves, computed over a longest
/// increasing subsequence so the move count is minimal. Matched items whose
/// [`DiffItem::content_eq`] is false get an update.
///
/// Preconditions, debug-asserted here: stable ids are unique within each
/// slice, and both slices are sorted by [`DiffItem::precedes`]. Violations
/// leave the consumer's view undefined; they are never repaired silently.
pub fn diff<T: DiffItem>(old: &[T], new: &[T]) -> Vec<ListEdit<T>> {
    debug_assert!(ids_unique(old), "duplicate stable id in old snapshot");
    debug_assert!(ids_unique(new), "duplicate stable id in new snapshot");
    debug_assert!(is_sorted(old), "old snapshot is not sorted");
    debug_assert!(is_sorted(new), "new snapshot is not sorted");

    let old_index_by_id: HashMap<T::Id, usize> = old
        .iter()
        .enumerate()
        .map(|(index, item)| (item.stable_id(), index))
        .collect();
    let new_index_by_id: HashMap<T::Id, usize> = new
        .iter()
        .enumerate()
        .map(|(index, item)| (item.stable_id(), index))
        .collect();

    let mut edits = Vec::new();

    // Deletes carry old indices, emitted descending so they can also be
    // applied one at a time without invalidating the remaining indices.
    for (index, item) in old.iter().enumerate().rev() {
        if !new_index_by_id.contains_key(&item.stable_id()) {
            edits.push(ListEdit::Delete { index });
        }
    }
    let deletes = edits.len();

    // Surviving items, in old order, with their target positions. The
    // longest increasing run of targets stays put; everything else moves.
    let survivors: Vec<(usize, usize)> = old
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            new_index_by_id
                .get(&item.stable_id())
                .map(|&target| (index, target))
        })
        .collect();
    let targets: Vec<usize> = survivors.iter().map(|&(_, target)| target).collect();
    let stable: HashSet<usize> = longest_increasing_run(&targets).into_iter().collect();
    for (position, &(from, to)) in survivors.iter().enumerate() {
        if !stable.contains(&position) {
            edits.push(ListEdit::Move { from, to });
        }
    }
    let moves = edits.len() - deletes;

    for (index, item) in new.iter().enumerate() {
        if !old_index_by_id.contains_key(&item.stable_id()) {
            edits.push(ListEdit::Insert {
                index,
                item: item.clone(),
            });
        }
    }
    let inserts = edits.len() - deletes - moves;

    for (index, item) in new.iter().enumerate() {
        if let Some(&old_index) = old_index_by_id.get(&item.stable_id()) {
            if !old[old_index].content_eq(item) {
                edits.push(ListEdit::Update {
                    index,
                    item: item.clone(),
                });
            }
        }
    }
    let updates = edits.len() - deletes - moves - inserts;

    tracing::trace!(deletes, moves, inserts, updates, "computed edit script");
    edits
}

/// Applies a script produced by [`diff`], returning the reconciled list.
///
/// `apply(old, &diff(old, new))` equals `new` element-wise. Behavior for
/// scripts not produced by [`diff`] over the same `old` is unspecified;
/// an update index past the reconciled list is debug-asserted.
pub fn apply<T: DiffItem>(old: &[T], edits: &[ListEdit<T>]) -> Vec<T> {
    let mut removed = vec![false; old.len()];
    let mut placements: Vec<(usize, T)> = Vec::new();
    let mut updates: Vec<(usize, T)> = Vec::new();

    for edit in edits {
        match edit {
            ListEdit::Delete { index } => {
                removed[*index] = true;
            }
            ListEdit::Move { from, to } => {
                removed[*from] = true;
                placements.push((*to, old[*from].clone()));
            }
            ListEdit::Insert { index, item } => {
                placements.push((*index, item.clone()));
            }
            ListEdit::Update { index, item } => {
                updates.push((*index, item.clone()));
            }
        }
    }

    let mut result: Vec<T> = old
        .iter()
        .zip(&removed)
        .filter(|&(_, gone)| !gone)
        .map(|(item, _)| item.clone())
        .collect();

    // Inserting at final positions in ascending order keeps earlier
    // placements valid while later ones land.
    placements.sort_by_key(|&(index, _)| index);
    for (index, item) in placements {
        let index = index.min(result.len());
        result.insert(index, item);
    }
    for (index, item) in updates {
        debug_assert!(
            index < result.len(),
            "update index {index} outside the reconciled list"
        );
        if let Some(slot) = result.get_mut(index) {
            *slot = item;
        }
    }
    result
}

fn ids_unique<T: DiffItem>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.stable_id()))
}

fn is_sorted<T: DiffItem>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].precedes(&pair[1]))
}

/// Indices of a longest strictly increasing subsequence of `seq`.
fn longest_increasing_run(seq: &[usize]) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (index, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&tail| seq[tail] < value);
        if slot > 0 {
            prev[index] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(index);
        } else {
            tails[slot] = index;
        }
    }
    let mut run = Vec::with_capacity(tails.len());
    let mut current = tails.last().copied();
    while let Some(index) = current {
        run.push(index);
        current = prev[index];
    }
    run.reverse();
    run
}
