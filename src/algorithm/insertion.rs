//! Insertion: `chooseNode`, `add`, `adjustTree`.
//!
//! `chooseNode` descends from the root, at each internal level picking the
//! child whose MBR needs the least enlargement to cover the new rectangle
//! (ties broken by smaller resulting area), and records the path taken on
//! the tree's `parents`/`parents_entry` scratch stacks so `adjust_tree` can
//! walk back up without re-descending.

use crate::node::NodeId;
use crate::rtree::RTree;
use crate::Rectangle;
use tracing::debug;

impl RTree {
    /// Inserts `(rect, id)` and returns once the tree's invariants hold
    /// again (root split handled, all ancestor MBRs updated).
    pub fn add(&mut self, rect: Rectangle, id: i32) {
        let leaf_id = self.choose_node(rect, 1);

        self.node_table.get_mut(leaf_id).add_entry(rect, id);
        let overflowed = self.node_table.get(leaf_id).entry_count() > self.config.max_node_entries();
        let sibling_id = if overflowed {
            Some(self.split_node(leaf_id))
        } else {
            None
        };

        self.adjust_tree(leaf_id, sibling_id);
        self.size += 1;
        debug!(id, size = self.size, "inserted entry");
    }

    /// Descends from the root to the single node at `target_level` whose
    /// subtree should hold `rect`, pushing `(parent_id, chosen_entry_index)`
    /// for every internal node visited onto the scratch stacks.
    pub(crate) fn choose_node(&mut self, rect: Rectangle, target_level: usize) -> NodeId {
        self.parents.clear();
        self.parents_entry.clear();

        let mut node_id = self.root_id;
        loop {
            let level = self.node_table.get(node_id).level();
            if level == target_level {
                return node_id;
            }

            let node = self.node_table.get(node_id);
            let mut best_index = 0;
            let mut best_enlargement = f64::INFINITY;
            let mut best_area = f64::INFINITY;
            for i in 0..node.entry_count() {
                let child_rect = node.rect_at(i);
                let enlargement = child_rect.enlargement(&rect);
                let area = child_rect.area();
                if enlargement < best_enlargement
                    || (enlargement == best_enlargement && area < best_area)
                {
                    best_enlargement = enlargement;
                    best_area = area;
                    best_index = i;
                }
            }
            let child_id = node.id_at(best_index) as NodeId;

            self.parents.push(node_id);
            self.parents_entry.push(best_index);
            node_id = child_id;
        }
    }

    /// Walks back up the path recorded by [`RTree::choose_node`], updating
    /// each ancestor's stored child MBR and, if a split produced a sibling
    /// at the level below, inserting the new sibling entry, recursing into
    /// another split if that overflows the ancestor in turn. If the split
    /// propagates past the root, a new root is grown over both halves.
    pub(crate) fn adjust_tree(&mut self, mut node_id: NodeId, mut sibling_id: Option<NodeId>) {
        while let Some(parent_id) = self.parents.pop() {
            let entry_index = self.parents_entry.pop().unwrap();

            let child_mbr = self.node_table.get(node_id).mbr();
            let parent = self.node_table.get_mut(parent_id);
            if parent.rect_at(entry_index) != child_mbr {
                parent.set_rect_at(entry_index, child_mbr);
                parent.recalculate_mbr();
            }

            if let Some(sib_id) = sibling_id {
                let sib_mbr = self.node_table.get(sib_id).mbr();
                let parent = self.node_table.get_mut(parent_id);
                parent.add_entry(sib_mbr, sib_id as i32);
                sibling_id = if parent.entry_count() > self.config.max_node_entries() {
                    Some(self.split_node(parent_id))
                } else {
                    None
                };
            } else {
                sibling_id = None;
            }

            node_id = parent_id;
        }

        if let Some(sib_id) = sibling_id {
            self.grow_root(node_id, sib_id);
        }
    }

    /// Allocates a new root one level above `left`/`right` (the two halves
    /// of a split that reached the old root) and points it at both.
    fn grow_root(&mut self, left: NodeId, right: NodeId) {
        let level = self.node_table.get(left).level() + 1;
        let capacity = self.node_capacity();
        let new_root = self.node_table.allocate(level, capacity);

        let left_mbr = self.node_table.get(left).mbr();
        let right_mbr = self.node_table.get(right).mbr();
        let root = self.node_table.get_mut(new_root);
        root.add_entry(left_mbr, left as i32);
        root.add_entry(right_mbr, right as i32);

        self.root_id = new_root;
        self.tree_height += 1;
        debug!(new_height = self.tree_height, "grew new root");
    }
}
