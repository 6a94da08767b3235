//! K-nearest-neighbour search.
//!
//! Three sink-based operations share one distance-to-MBR building block:
//!
//! - `nearest` is a recursive descent that tracks a single running `bestSq`
//!   plus every id currently tied at it (`nearest_ids`, reset per call),
//!   descending into any child whose MBR distance is within `bestSq` and
//!   narrowing `bestSq` whenever a strictly closer entry turns up.
//! - `nearest_n` and `nearest_n_unsorted` both collect every entry within
//!   `furthest_distance`, extend the cut past `count` to include any ties
//!   at the boundary distance, and then differ only in emission order:
//!   `nearest_n` streams ascending, `nearest_n_unsorted` streams in
//!   whatever order collection produced them, so the same set either way.
//! - `nearest_n_legacy` is a second, independent k-NN implementation kept
//!   for parity with the deprecated sorted-list-based path some R-tree
//!   implementations shipped alongside the modern heap-based one: a plain
//!   recursive descent inserting candidates into the bounded
//!   [`SortedList`](crate::sorted_list::SortedList), using the negated
//!   squared distance as priority so the list's "keep the highest priority"
//!   rule keeps the closest entries.

use crate::node::NodeId;
use crate::priority_queue::HeapOrder;
use crate::rtree::RTree;
use crate::Point;

impl RTree {
    /// Calls `sink(id)` once for every entry tied for closest to `point`
    /// among those within `furthest_distance`. Stops early if `sink`
    /// returns `false`. The sink is never called if the tree is empty or
    /// nothing lies within `furthest_distance`.
    pub fn nearest(&mut self, point: Point, furthest_distance: f64, mut sink: impl FnMut(i32) -> bool) {
        if self.size == 0 {
            return;
        }
        self.nearest_ids.clear();
        let mut best_sq = furthest_distance * furthest_distance;
        self.nearest_rec(self.root_id, point, &mut best_sq);
        for i in 0..self.nearest_ids.len() {
            if !sink(self.nearest_ids[i]) {
                return;
            }
        }
    }

    fn nearest_rec(&mut self, node_id: NodeId, point: Point, best_sq: &mut f64) {
        let node = self.node_table.get(node_id);
        let count = node.entry_count();
        let is_leaf = node.is_leaf();

        if is_leaf {
            for i in 0..count {
                let node = self.node_table.get(node_id);
                let d = node.rect_at(i).distance_sq(point);
                if d < *best_sq {
                    *best_sq = d;
                    self.nearest_ids.clear();
                    self.nearest_ids.push(node.id_at(i));
                } else if d == *best_sq {
                    self.nearest_ids.push(node.id_at(i));
                }
            }
        } else {
            for i in 0..count {
                let node = self.node_table.get(node_id);
                let child_rect = node.rect_at(i);
                let child_id = node.id_at(i) as NodeId;
                if child_rect.distance_sq(point) <= *best_sq {
                    self.nearest_rec(child_id, point, best_sq);
                }
            }
        }
    }

    /// Calls `sink(id)` for the `count` closest entries to `point` within
    /// `furthest_distance`, nearest first; if entries tie for the `count`-th
    /// distance, every tied id is included, so more than `count` ids may be
    /// emitted. Stops early if `sink` returns `false`.
    pub fn nearest_n(
        &mut self,
        point: Point,
        count: usize,
        furthest_distance: f64,
        mut sink: impl FnMut(i32) -> bool,
    ) {
        for (id, _) in self.collect_nearest_candidates(point, count, furthest_distance) {
            if !sink(id) {
                return;
            }
        }
    }

    /// Same contents and boundary-tie handling as [`RTree::nearest_n`], but
    /// emitted in whatever order the underlying collection produced rather
    /// than paying for an explicit ascending sort. Same **set** of ids as
    /// `nearest_n` for identical arguments; no ordering guarantee.
    pub fn nearest_n_unsorted(
        &mut self,
        point: Point,
        count: usize,
        furthest_distance: f64,
        mut sink: impl FnMut(i32) -> bool,
    ) {
        for (id, _) in self
            .collect_nearest_candidates(point, count, furthest_distance)
            .into_iter()
            .rev()
        {
            if !sink(id) {
                return;
            }
        }
    }

    /// Every entry within `furthest_distance`, sorted ascending by squared
    /// distance, truncated at `count` but extended to include any entries
    /// tying the `count`-th distance.
    fn collect_nearest_candidates(
        &mut self,
        point: Point,
        count: usize,
        furthest_distance: f64,
    ) -> Vec<(i32, f64)> {
        if count == 0 || self.size == 0 {
            return Vec::new();
        }
        let cutoff_sq = furthest_distance * furthest_distance;
        self.heap.clear();
        self.heap.set_order(HeapOrder::Ascending);
        self.collect_within_cutoff(self.root_id, point, cutoff_sq);

        let mut ascending = Vec::with_capacity(self.heap.size());
        while let Some(pair) = self.heap.pop() {
            ascending.push(pair);
        }

        if ascending.len() > count {
            let boundary = ascending[count - 1].1;
            let mut end = count;
            while end < ascending.len() && ascending[end].1 == boundary {
                end += 1;
            }
            ascending.truncate(end);
        }
        ascending
    }

    fn collect_within_cutoff(&mut self, node_id: NodeId, point: Point, cutoff_sq: f64) {
        let node = self.node_table.get(node_id);
        let count = node.entry_count();
        let is_leaf = node.is_leaf();

        for i in 0..count {
            let node = self.node_table.get(node_id);
            let rect = node.rect_at(i);
            let d = rect.distance_sq(point);
            if d > cutoff_sq {
                continue;
            }
            if is_leaf {
                self.heap.insert(node.id_at(i), d);
            } else {
                let child_id = node.id_at(i) as NodeId;
                self.collect_within_cutoff(child_id, point, cutoff_sq);
            }
        }
    }

    /// The deprecated sorted-list-based k-NN path, kept alongside
    /// `nearest_n` rather than omitted.
    pub fn nearest_n_legacy(
        &mut self,
        point: Point,
        count: usize,
        furthest_distance: f64,
        mut sink: impl FnMut(i32) -> bool,
    ) {
        if count == 0 || self.size == 0 {
            return;
        }
        self.sorted_list.reset(count);
        let cutoff_sq = furthest_distance * furthest_distance;
        self.nearest_n_legacy_rec(self.root_id, point, cutoff_sq);

        for i in 0..self.sorted_list.size() {
            let id = self.sorted_list.iter().nth(i).unwrap().0;
            if !sink(id) {
                return;
            }
        }
    }

    fn nearest_n_legacy_rec(&mut self, node_id: NodeId, point: Point, cutoff_sq: f64) {
        let node = self.node_table.get(node_id);
        let count = node.entry_count();
        let is_leaf = node.is_leaf();

        for i in 0..count {
            let node = self.node_table.get(node_id);
            let rect = node.rect_at(i);
            let d = rect.distance_sq(point);
            if d > cutoff_sq {
                continue;
            }
            if is_leaf {
                self.sorted_list.insert(node.id_at(i), -d);
            } else {
                let child_id = node.id_at(i) as NodeId;
                self.nearest_n_legacy_rec(child_id, point, cutoff_sq);
            }
        }
    }
}
