//! Deletion: locate the entry, remove it, then condense the tree.
//!
//! Finding the holding leaf cannot reuse `choose_node`'s enlargement-driven
//! descent (a rectangle may be containable, and stored, under more than one
//! subtree once overlapping MBRs exist), so `find_leaf` instead walks an
//! explicit frame stack into every child whose MBR *contains* the target
//! rectangle, since by construction an entry's ancestors always fully
//! contain it, backtracking to the next untried sibling until an exact
//! coordinate-and-id match turns up. `condense_tree` then walks back up the
//! confirmed path, tightening MBRs and collecting the contents of any node
//! that dropped below `min_node_entries` so they can be reinserted at their
//! original level rather than lost.

use crate::node::NodeId;
use crate::rtree::RTree;
use crate::Rectangle;
use tracing::debug;

impl RTree {
    /// Removes the entry whose rectangle and id match exactly. Returns
    /// `false` if no such entry exists.
    pub fn delete(&mut self, rect: Rectangle, id: i32) -> bool {
        let Some((leaf_id, entry_index)) = self.find_leaf(rect, id) else {
            return false;
        };
        self.node_table.get_mut(leaf_id).delete_entry(entry_index);
        self.condense_tree(leaf_id);
        self.size -= 1;
        debug!(id, size = self.size, "deleted entry");
        true
    }

    /// Iterative (not recursive) search for the leaf holding `(rect, id)`.
    /// Each stack frame is `(node_id, next_child_index_to_try)`: when a
    /// subtree comes up empty the frame above simply resumes from where it
    /// left off, exactly as described for the iterative find-leaf descent.
    pub(crate) fn find_leaf(&mut self, rect: Rectangle, id: i32) -> Option<(NodeId, usize)> {
        self.parents.clear();
        self.parents_entry.clear();

        let mut stack: Vec<(NodeId, usize)> = vec![(self.root_id, 0)];
        loop {
            let &(node_id, cursor) = stack.last()?;
            let node = self.node_table.get(node_id);

            if node.is_leaf() {
                let found = node.find_entry(rect, id);
                stack.pop();
                if let Some(index) = found {
                    for &(ancestor_id, next_cursor) in &stack {
                        self.parents.push(ancestor_id);
                        self.parents_entry.push(next_cursor - 1);
                    }
                    return Some((node_id, index));
                }
                continue;
            }

            let mut next_match = None;
            let mut i = cursor;
            while i < node.entry_count() {
                if node.rect_at(i).contains(&rect) {
                    next_match = Some(i);
                    break;
                }
                i += 1;
            }

            match next_match {
                Some(i) => {
                    let child_id = node.id_at(i) as NodeId;
                    let last = stack.len() - 1;
                    stack[last].1 = i + 1;
                    stack.push((child_id, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    pub(crate) fn condense_tree(&mut self, leaf_id: NodeId) {
        let mut reinsert: Vec<(Rectangle, i32, usize)> = Vec::new();
        let mut current = leaf_id;

        while let Some(parent_id) = self.parents.pop() {
            let entry_index = self.parents_entry.pop().unwrap();
            let current_count = self.node_table.get(current).entry_count();

            if current != self.root_id && current_count < self.config.min_node_entries() {
                let level = self.node_table.get(current).level();
                let node = self.node_table.get(current);
                for i in 0..node.entry_count() {
                    reinsert.push((node.rect_at(i), node.id_at(i), level));
                }
                self.node_table.get_mut(parent_id).delete_entry(entry_index);
                self.node_table.free(current);
            } else {
                let mbr = self.node_table.get(current).mbr();
                let parent = self.node_table.get_mut(parent_id);
                if parent.rect_at(entry_index) != mbr {
                    parent.set_rect_at(entry_index, mbr);
                    parent.recalculate_mbr();
                }
            }
            current = parent_id;
        }

        for (rect, id, level) in reinsert {
            self.reinsert_at_level(rect, id, level);
        }

        self.shorten_root();
    }

    /// Collapses the root downward while it is internal and holds exactly
    /// one child, so tree height tracks actual content rather than
    /// accumulating empty levels after deletions.
    fn shorten_root(&mut self) {
        loop {
            let root = self.node_table.get(self.root_id);
            if root.is_leaf() || root.entry_count() != 1 {
                break;
            }
            let only_child = root.id_at(0) as NodeId;
            let old_root = self.root_id;
            self.root_id = only_child;
            self.tree_height -= 1;
            self.node_table.free(old_root);
        }
    }

    /// Reinserts an orphaned subtree (or leaf entry) at the level it was
    /// originally found at, via the same choose/split/adjust path as a
    /// fresh `add`, but without touching `size` (nothing new is being
    /// added, a subtree that already existed is being relocated).
    fn reinsert_at_level(&mut self, rect: Rectangle, id: i32, level: usize) {
        let node_id = self.choose_node(rect, level);
        self.node_table.get_mut(node_id).add_entry(rect, id);
        let overflowed =
            self.node_table.get(node_id).entry_count() > self.config.max_node_entries();
        let sibling_id = if overflowed {
            Some(self.split_node(node_id))
        } else {
            None
        };
        self.adjust_tree(node_id, sibling_id);
    }
}

#[cfg(test)]
mod test {
    use crate::config::RTreeConfig;
    use crate::RTree;
    use crate::Rectangle;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle::new(min_x, min_y, max_x, max_y)
    }

    #[test]
    fn delete_missing_entry_returns_false() {
        let mut tree = RTree::new();
        tree.add(rect(0.0, 0.0, 1.0, 1.0), 1);
        assert!(!tree.delete(rect(5.0, 5.0, 6.0, 6.0), 1));
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn delete_last_entry_empties_tree() {
        let mut tree = RTree::new();
        tree.add(rect(0.0, 0.0, 1.0, 1.0), 1);
        assert!(tree.delete(rect(0.0, 0.0, 1.0, 1.0), 1));
        assert_eq!(tree.size(), 0);
        assert!(tree.bounds().is_empty());
    }

    #[test]
    fn delete_requires_matching_id_not_just_rectangle() {
        let mut tree = RTree::new();
        tree.add(rect(0.0, 0.0, 1.0, 1.0), 1);
        tree.add(rect(0.0, 0.0, 1.0, 1.0), 2);
        assert!(!tree.delete(rect(0.0, 0.0, 1.0, 1.0), 3));
        assert!(tree.delete(rect(0.0, 0.0, 1.0, 1.0), 1));
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn mass_insert_then_delete_all_leaves_empty_sane_tree() {
        let mut tree = RTree::with_config(RTreeConfig::new(4, 2));
        let rects: Vec<(Rectangle, i32)> = (0..300)
            .map(|i| {
                let x = (i % 30) as f64;
                let y = (i / 30) as f64;
                (rect(x, y, x + 0.5, y + 0.5), i)
            })
            .collect();
        for &(r, id) in &rects {
            tree.add(r, id);
        }
        tree.sanity_check().expect("sane after inserts");
        for &(r, id) in &rects {
            assert!(tree.delete(r, id), "failed to delete id {id}");
            tree.sanity_check().expect("sane mid-deletion");
        }
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 1);
    }
}
