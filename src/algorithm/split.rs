//! Guttman's quadratic-cost node split.
//!
//! Called once a node has accepted one more entry than `max_node_entries`
//! (using its reserved `+ 1` scratch slot, see `node.rs`). `pick_seeds`
//! chooses the two entries that would waste the most area if forced into
//! the same group; `pick_next` then repeatedly assigns the remaining
//! entries to whichever group's MBR would grow least, short-circuiting once
//! one group's remaining capacity is needed to keep the other above
//! `min_node_entries`.

use crate::node::{Node, NodeId};
use crate::rtree::{RTree, GROUP_ONE, GROUP_TWO, UNASSIGNED};
use crate::Rectangle;

impl RTree {
    /// Splits the over-full node `node_id` in place: the losing group's
    /// entries are moved to a freshly allocated sibling node (same level),
    /// and `node_id` is left holding only the winning group. Returns the
    /// sibling's id.
    pub(crate) fn split_node(&mut self, node_id: NodeId) -> NodeId {
        let min_entries = self.config.min_node_entries();
        let level = self.node_table.get(node_id).level();
        let capacity = self.node_capacity();
        let candidate_count = self.node_table.get(node_id).entry_count();

        self.entry_status.clear();
        self.entry_status.resize(candidate_count, UNASSIGNED);

        let (seed1, seed2) = {
            let node = self.node_table.get(node_id);
            pick_seeds(node)
        };
        self.entry_status[seed1] = GROUP_ONE;
        self.entry_status[seed2] = GROUP_TWO;

        let mut group1_mbr = self.node_table.get(node_id).rect_at(seed1);
        let mut group2_mbr = self.node_table.get(node_id).rect_at(seed2);
        let mut group1_count = 1usize;
        let mut group2_count = 1usize;
        let mut remaining = candidate_count - 2;

        while remaining > 0 {
            let need1 = min_entries.saturating_sub(group1_count);
            let need2 = min_entries.saturating_sub(group2_count);
            if need1 > 0 && remaining == need1 {
                assign_remaining(&mut self.entry_status, GROUP_ONE);
                break;
            }
            if need2 > 0 && remaining == need2 {
                assign_remaining(&mut self.entry_status, GROUP_TWO);
                break;
            }

            let node = self.node_table.get(node_id);
            let (chosen, into_group, rect) =
                pick_next(node, &self.entry_status, group1_mbr, group2_mbr);
            self.entry_status[chosen] = into_group;
            if into_group == GROUP_ONE {
                group1_mbr.add(&rect);
                group1_count += 1;
            } else {
                group2_mbr.add(&rect);
                group2_count += 1;
            }
            remaining -= 1;
        }

        let sibling_id = self.node_table.allocate(level, capacity);
        for i in 0..candidate_count {
            if self.entry_status[i] == GROUP_TWO {
                let node = self.node_table.get(node_id);
                let rect = node.rect_at(i);
                let id = node.id_at(i);
                self.node_table.get_mut(sibling_id).add_entry(rect, id);
                self.node_table.get_mut(node_id).tombstone(i);
            }
        }
        self.node_table.get_mut(node_id).reorganize();

        sibling_id
    }
}

fn assign_remaining(entry_status: &mut [u8], group: u8) {
    for status in entry_status.iter_mut() {
        if *status == UNASSIGNED {
            *status = group;
        }
    }
}

/// Finds the pair of entries that would be most wasteful to place in the
/// same group: for each axis, the entry with the greatest minimum and the
/// entry with the smallest maximum, scored by their separation normalised
/// to the candidate set's overall extent on that axis. Falls back to
/// (lowest `min_y`, then highest `max_x` among the rest) if both axes
/// degenerate to the same entry on both sides.
fn pick_seeds(node: &Node) -> (usize, usize) {
    let n = node.entry_count();
    let mbr = node.mbr();

    let mut best_separation = f64::NEG_INFINITY;
    let mut best_pair: Option<(usize, usize)> = None;

    for axis in 0..2 {
        let mut highest_low_idx = 0;
        let mut highest_low_val = f64::NEG_INFINITY;
        let mut lowest_high_idx = 0;
        let mut lowest_high_val = f64::INFINITY;

        for i in 0..n {
            let r = node.rect_at(i);
            let (lo, hi) = if axis == 0 {
                (r.min_x, r.max_x)
            } else {
                (r.min_y, r.max_y)
            };
            if lo > highest_low_val {
                highest_low_val = lo;
                highest_low_idx = i;
            }
            if hi < lowest_high_val {
                lowest_high_val = hi;
                lowest_high_idx = i;
            }
        }

        if highest_low_idx == lowest_high_idx {
            continue;
        }

        let extent = if axis == 0 {
            mbr.max_x - mbr.min_x
        } else {
            mbr.max_y - mbr.min_y
        };
        let separation = if extent > 0.0 {
            (highest_low_val - lowest_high_val) / extent
        } else {
            0.0
        };
        if separation > best_separation {
            best_separation = separation;
            best_pair = Some((highest_low_idx, lowest_high_idx));
        }
    }

    best_pair.unwrap_or_else(|| fallback_seeds(node))
}

fn fallback_seeds(node: &Node) -> (usize, usize) {
    let n = node.entry_count();
    let seed1 = (0..n)
        .min_by(|&a, &b| {
            node.rect_at(a)
                .min_y
                .partial_cmp(&node.rect_at(b).min_y)
                .unwrap()
        })
        .unwrap();
    let seed2 = (0..n)
        .filter(|&i| i != seed1)
        .max_by(|&a, &b| {
            node.rect_at(a)
                .max_x
                .partial_cmp(&node.rect_at(b).max_x)
                .unwrap()
        })
        .unwrap();
    (seed1, seed2)
}

/// Picks the unassigned entry whose enlargement preference between the two
/// groups is most decisive, and the group it prefers. Ties broken by
/// smaller resulting area, then fewer current entries, then group one.
fn pick_next(
    node: &Node,
    entry_status: &[u8],
    group1_mbr: Rectangle,
    group2_mbr: Rectangle,
) -> (usize, u8, Rectangle) {
    let mut best_index = usize::MAX;
    let mut best_group = GROUP_ONE;
    let mut best_diff = f64::NEG_INFINITY;
    let mut best_rect = Rectangle::empty();

    for i in 0..node.entry_count() {
        if entry_status[i] != UNASSIGNED {
            continue;
        }
        let rect = node.rect_at(i);
        let enlargement1 = group1_mbr.enlargement(&rect);
        let enlargement2 = group2_mbr.enlargement(&rect);
        let diff = (enlargement1 - enlargement2).abs();

        if diff > best_diff {
            best_diff = diff;
            best_index = i;
            best_rect = rect;
            best_group = preferred_group(enlargement1, enlargement2, group1_mbr, group2_mbr);
        }
    }

    (best_index, best_group, best_rect)
}

fn preferred_group(
    enlargement1: f64,
    enlargement2: f64,
    group1_mbr: Rectangle,
    group2_mbr: Rectangle,
) -> u8 {
    if enlargement1 != enlargement2 {
        return if enlargement1 < enlargement2 {
            GROUP_ONE
        } else {
            GROUP_TWO
        };
    }
    let area1 = group1_mbr.area();
    let area2 = group2_mbr.area();
    if area1 != area2 {
        return if area1 < area2 { GROUP_ONE } else { GROUP_TWO };
    }
    GROUP_ONE
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::RTreeConfig;
    use crate::RTree;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle::new(min_x, min_y, max_x, max_y)
    }

    #[test]
    fn pick_seeds_favours_widely_separated_entries() {
        let mut node = Node::new(0, 1, 4);
        node.add_entry(rect(0.0, 0.0, 1.0, 1.0), 1);
        node.add_entry(rect(0.0, 0.0, 1.0, 1.0), 2);
        node.add_entry(rect(100.0, 100.0, 101.0, 101.0), 3);
        let (a, b) = pick_seeds(&node);
        assert_ne!(a, b);
        let ids = [node.id_at(a), node.id_at(b)];
        assert!(ids.contains(&3));
    }

    #[test]
    fn split_node_distributes_entries_between_both_halves() {
        let mut tree = RTree::with_config(RTreeConfig::new(4, 2));
        for i in 0..5 {
            let x = i as f64 * 10.0;
            tree.add(rect(x, 0.0, x + 1.0, 1.0), i);
        }
        assert_eq!(tree.size(), 5);
        tree.sanity_check().expect("split leaves a sane tree");
    }
}
