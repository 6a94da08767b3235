//! Rectangle intersection and containment queries.
//!
//! Both queries share the same descent rule, recursing only into a child
//! whose MBR intersects the query rectangle, since a strictly disjoint
//! subtree cannot hold a matching entry either way, and differ only in the
//! leaf-level test: intersection accepts any overlap, containment requires
//! the query rectangle to fully cover the stored entry. The sink is called
//! once per match and may return `false` to stop the traversal early.

use crate::node::NodeId;
use crate::rtree::RTree;
use crate::Rectangle;

impl RTree {
    /// Calls `sink(id)` for every entry whose rectangle intersects `query`,
    /// in no particular order. Stops early if `sink` returns `false`.
    pub fn intersects(&self, query: Rectangle, sink: impl FnMut(i32) -> bool) {
        self.traverse(query, Rectangle::intersects, sink);
    }

    /// Calls `sink(id)` for every entry whose rectangle is fully contained
    /// within `query`. Stops early if `sink` returns `false`.
    pub fn contains(&self, query: Rectangle, sink: impl FnMut(i32) -> bool) {
        self.traverse(query, |entry, q| q.contains(entry), sink);
    }

    fn traverse(
        &self,
        query: Rectangle,
        leaf_matches: impl Fn(&Rectangle, &Rectangle) -> bool,
        mut sink: impl FnMut(i32) -> bool,
    ) {
        let mut stack: Vec<NodeId> = vec![self.root_id];
        while let Some(node_id) = stack.pop() {
            let node = self.node_table.get(node_id);
            if node.is_leaf() {
                for i in 0..node.entry_count() {
                    let entry_rect = node.rect_at(i);
                    if leaf_matches(&entry_rect, &query) && !sink(node.id_at(i)) {
                        return;
                    }
                }
            } else {
                for i in 0..node.entry_count() {
                    if node.rect_at(i).intersects(&query) {
                        stack.push(node.id_at(i) as NodeId);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::RTree;
    use crate::Rectangle;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle::new(min_x, min_y, max_x, max_y)
    }

    fn build() -> RTree {
        let mut tree = RTree::new();
        tree.add(rect(0.0, 0.0, 1.0, 1.0), 1);
        tree.add(rect(5.0, 5.0, 6.0, 6.0), 2);
        tree.add(rect(0.5, 0.5, 2.0, 2.0), 3);
        tree
    }

    #[test]
    fn intersects_finds_overlapping_entries_only() {
        let tree = build();
        let mut hits = Vec::new();
        tree.intersects(rect(0.0, 0.0, 1.5, 1.5), |id| {
            hits.push(id);
            true
        });
        hits.sort();
        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn contains_requires_full_containment_in_query() {
        let tree = build();
        let mut hits = Vec::new();
        tree.contains(rect(-1.0, -1.0, 1.0, 1.0), |id| {
            hits.push(id);
            true
        });
        // Entry 3 intersects but is not fully inside the query rectangle.
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn sink_returning_false_stops_traversal_early() {
        let tree = build();
        let mut calls = 0;
        tree.intersects(rect(-10.0, -10.0, 10.0, 10.0), |_| {
            calls += 1;
            false
        });
        assert_eq!(calls, 1);
    }
}
