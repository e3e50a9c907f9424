//! Flat row lists to nested resource trees and back.

use std::collections::HashMap;

use drivehub_entity::resource::{Resource, ResourceNode};

/// Nest `rows` under their parents.
///
/// A row is attached to its parent when the parent is part of `rows` and
/// is a folder; otherwise it is returned at the top level. Rows whose
/// parent lies outside the page therefore surface as top-level nodes.
/// Input order is kept both among top-level nodes and among siblings.
/// A parent chain that loops back on itself is cut at the row that
/// closes the loop, which then becomes top-level.
pub fn build_tree(rows: Vec<Resource>) -> Vec<ResourceNode> {
    let index: HashMap<_, _> = rows.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

    let mut parents: Vec<Option<usize>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.parent_id
                .and_then(|pid| index.get(&pid).copied())
                .filter(|&p| p != i && rows[p].is_folder)
        })
        .collect();
    break_cycles(&mut parents);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut roots = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    // Pre-order visit; walked in reverse so children are complete before
    // their parent takes them.
    let mut order = Vec::with_capacity(rows.len());
    let mut stack = roots.clone();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().copied());
    }

    let mut slots: Vec<Option<ResourceNode>> =
        rows.into_iter().map(|r| Some(ResourceNode::new(r))).collect();
    for &i in order.iter().rev() {
        if children[i].is_empty() {
            continue;
        }
        let kids: Vec<ResourceNode> = children[i].iter().filter_map(|&c| slots[c].take()).collect();
        if let Some(node) = slots[i].as_mut() {
            node.children.get_or_insert_with(Vec::new).extend(kids);
        }
    }

    roots.into_iter().filter_map(|r| slots[r].take()).collect()
}

fn break_cycles(parents: &mut [Option<usize>]) {
    const NEW: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![NEW; parents.len()];
    for start in 0..parents.len() {
        if state[start] != NEW {
            continue;
        }
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                NEW => {
                    state[current] = ON_PATH;
                    path.push(current);
                    match parents[current] {
                        Some(p) => current = p,
                        None => break,
                    }
                }
                ON_PATH => {
                    if let Some(&last) = path.last() {
                        parents[last] = None;
                    }
                    break;
                }
                _ => break,
            }
        }
        for i in path {
            state[i] = DONE;
        }
    }
}

/// Flatten a forest back into rows, parents before children.
pub fn flatten(nodes: Vec<ResourceNode>) -> Vec<Resource> {
    let mut out = Vec::new();
    let mut stack: Vec<ResourceNode> = nodes.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Some(children) = node.children {
            stack.extend(children.into_iter().rev());
        }
        out.push(node.resource);
    }
    out
}
