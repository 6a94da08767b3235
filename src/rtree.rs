//! The public R-tree container.
//!
//! A single struct owning storage plus scratch buffers reused across
//! operations so that no insert/delete/query allocates on the hot path,
//! with the actual algorithms implemented as `impl RTree` blocks in
//! `crate::algorithm::*`. The tree is 2D-only and non-generic
//! (geometry.rs), and nodes live in a [`NodeTable`] addressed by integer id
//! rather than being owned directly by their parent (node.rs).

use crate::config::RTreeConfig;
use crate::error::RTreeError;
use crate::node::{NodeId, NodeTable};
use crate::priority_queue::{HeapOrder, PriorityQueue};
use crate::sorted_list::SortedList;
use crate::Rectangle;
use tracing::{debug, info};

/// The crate version, exposed so embedders can record which algorithm
/// revision produced a serialized tree.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// An in-memory R-tree over axis-aligned rectangles tagged with caller ids.
///
/// Not `Sync`: every operation (including reads) mutates scratch buffers
/// owned by the tree (descent stacks, the nearest-neighbour heap and sorted
/// list), so concurrent use from multiple threads, even multiple readers,
/// is undefined. Wrap in a mutex if shared access is required.
#[derive(Debug, Clone)]
pub struct RTree {
    pub(crate) config: RTreeConfig,
    pub(crate) node_table: NodeTable,
    pub(crate) root_id: NodeId,
    pub(crate) tree_height: usize,
    pub(crate) size: usize,

    // Scratch buffers, reused across calls to avoid per-operation allocation.
    pub(crate) parents: Vec<NodeId>,
    pub(crate) parents_entry: Vec<usize>,
    pub(crate) entry_status: Vec<u8>,
    pub(crate) nearest_ids: Vec<i32>,
    pub(crate) sorted_list: SortedList,
    pub(crate) heap: PriorityQueue,
}

/// Group assignment used by the split scratch buffer (`entry_status`).
pub(crate) const UNASSIGNED: u8 = 0;
pub(crate) const GROUP_ONE: u8 = 1;
pub(crate) const GROUP_TWO: u8 = 2;

impl Default for RTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RTree {
    /// Creates an empty tree with the default node capacity (50, 20).
    pub fn new() -> Self {
        Self::with_config(RTreeConfig::default())
    }

    /// Creates an empty tree with a caller-chosen node capacity.
    pub fn with_config(config: RTreeConfig) -> Self {
        let mut node_table = NodeTable::new();
        let capacity = config.max_node_entries() + 1;
        let root_id = node_table.allocate(1, capacity);
        info!(
            max_node_entries = config.max_node_entries(),
            min_node_entries = config.min_node_entries(),
            "created new RTree"
        );
        RTree {
            config,
            node_table,
            root_id,
            tree_height: 1,
            size: 0,
            parents: Vec::new(),
            parents_entry: Vec::new(),
            entry_status: Vec::new(),
            nearest_ids: Vec::new(),
            sorted_list: SortedList::new(0),
            heap: PriorityQueue::new(HeapOrder::Ascending),
        }
    }

    /// Number of (rectangle, id) entries currently stored.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The minimum bounding rectangle of everything in the tree, or the
    /// empty sentinel if the tree holds nothing.
    pub fn bounds(&self) -> Rectangle {
        self.node_table.get(self.root_id).mbr()
    }

    /// Height of the tree in levels; a tree with only a root leaf has height 1.
    pub fn height(&self) -> usize {
        self.tree_height
    }

    /// Per-call capacity reserved for a node at any level: `max + 1`, the
    /// extra slot used to stage the overflow entry during a split.
    pub(crate) fn node_capacity(&self) -> usize {
        self.config.max_node_entries() + 1
    }

    /// Walks every live node and checks the invariants from the container's
    /// own bookkeeping: every non-root node has between `min_node_entries`
    /// and `max_node_entries` entries, every node's stored MBR equals the
    /// union of its entries, and every child id referenced by an internal
    /// node actually exists in the node table with `level - 1`.
    ///
    /// Intended for tests and debugging, not the hot path.
    pub fn sanity_check(&self) -> Result<(), RTreeError> {
        self.check_node(self.root_id, true)?;
        debug!("sanity check passed");
        Ok(())
    }

    fn check_node(&self, node_id: NodeId, is_root: bool) -> Result<(), RTreeError> {
        let node = self.node_table.get(node_id);
        let count = node.entry_count();

        if !is_root {
            if count < self.config.min_node_entries() {
                return Err(RTreeError::CorruptTree {
                    reason: format!(
                        "node {node_id} has {count} entries, below minimum {}",
                        self.config.min_node_entries()
                    ),
                });
            }
        }
        if count > self.config.max_node_entries() {
            return Err(RTreeError::CorruptTree {
                reason: format!(
                    "node {node_id} has {count} entries, above maximum {}",
                    self.config.max_node_entries()
                ),
            });
        }

        let mut expected_mbr = Rectangle::empty();
        for i in 0..count {
            expected_mbr.add(&node.rect_at(i));
        }
        if count > 0 && expected_mbr != node.mbr() {
            return Err(RTreeError::CorruptTree {
                reason: format!("node {node_id} MBR does not match the union of its entries"),
            });
        }

        if !node.is_leaf() {
            for i in 0..count {
                let child_id = node.id_at(i) as NodeId;
                if !self.node_table.contains(child_id) {
                    return Err(RTreeError::CorruptTree {
                        reason: format!(
                            "node {node_id} references missing child node {child_id}"
                        ),
                    });
                }
                let child = self.node_table.get(child_id);
                if child.level() + 1 != node.level() {
                    return Err(RTreeError::CorruptTree {
                        reason: format!(
                            "child node {child_id} has level {} under parent at level {}",
                            child.level(),
                            node.level()
                        ),
                    });
                }
                self.check_node(child_id, false)?;
            }
        }
        Ok(())
    }
}
