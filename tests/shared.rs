//! Shared helpers for integration tests: a linear-scan oracle independent
//! of `flatrtree::node`/`flatrtree::algorithm`, plus small rectangle
//! constructors used across the suite.

#![allow(dead_code)]

use flatrtree::{Point, Rectangle};

pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
    Rectangle::new(min_x, min_y, max_x, max_y)
}

/// A plain `Vec`-backed index answering the same three query families as
/// `RTree`, used as a correctness reference in property tests. Shares no
/// code with `flatrtree::node` or `flatrtree::algorithm`.
#[derive(Default)]
pub struct LinearScanOracle {
    entries: Vec<(Rectangle, i32)>,
}

impl LinearScanOracle {
    pub fn new() -> Self {
        LinearScanOracle { entries: Vec::new() }
    }

    pub fn add(&mut self, rect: Rectangle, id: i32) {
        self.entries.push((rect, id));
    }

    pub fn delete(&mut self, rect: Rectangle, id: i32) -> bool {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|&(r, i)| i == id && r == rect)
        {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn intersects(&self, query: Rectangle) -> Vec<i32> {
        self.entries
            .iter()
            .filter(|(r, _)| r.intersects(&query))
            .map(|&(_, id)| id)
            .collect()
    }

    pub fn contains(&self, query: Rectangle) -> Vec<i32> {
        self.entries
            .iter()
            .filter(|(r, _)| query.contains(r))
            .map(|&(_, id)| id)
            .collect()
    }

    /// All ids within `furthest_distance` of `point`, paired with their
    /// squared distance, sorted ascending.
    fn ranked(&self, point: Point, furthest_distance: f64) -> Vec<(i32, f64)> {
        let cutoff_sq = furthest_distance * furthest_distance;
        let mut ranked: Vec<(i32, f64)> = self
            .entries
            .iter()
            .map(|&(r, id)| (id, r.distance_sq(point)))
            .filter(|&(_, d)| d <= cutoff_sq)
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        ranked
    }

    pub fn nearest(&self, point: Point, furthest_distance: f64) -> Vec<i32> {
        let ranked = self.ranked(point, furthest_distance);
        let Some(&(_, best)) = ranked.first() else {
            return Vec::new();
        };
        ranked
            .into_iter()
            .take_while(|&(_, d)| d == best)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn nearest_n(&self, point: Point, count: usize, furthest_distance: f64) -> Vec<i32> {
        let ranked = self.ranked(point, furthest_distance);
        if count == 0 || ranked.is_empty() {
            return Vec::new();
        }
        let end = count.min(ranked.len());
        let boundary = ranked[end - 1].1;
        ranked
            .into_iter()
            .take_while(|&(_, d)| d <= boundary)
            .map(|(id, _)| id)
            .collect()
    }
}

pub fn sorted(mut v: Vec<i32>) -> Vec<i32> {
    v.sort();
    v
}
