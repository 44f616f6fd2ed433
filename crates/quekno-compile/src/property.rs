//! `PropertySet` and related types for pass communication.
//!
//! The [`PropertySet`] is the shared context handed to every pass. It carries
//! the device [`CouplingMap`], the current [`Layout`] and arbitrary typed
//! results (for example routing statistics).
//!
//! # Example
//!
//! ```
//! use quekno_compile::{CouplingMap, Layout, PropertySet};
//! use quekno_ir::QubitId;
//!
//! let props = PropertySet::new()
//!     .with_coupling_map(CouplingMap::ring(5))
//!     .with_layout(Layout::from_mapping(&[4, 0, 1, 2, 3]));
//!
//! let layout = props.layout.as_ref().unwrap();
//! assert_eq!(layout.get_physical(QubitId(0)), Some(4));
//! assert!(props.coupling_map.as_ref().unwrap().has_edge(4, 0));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::VecDeque;

use quekno_ir::QubitId;

use crate::error::{CompileError, CompileResult};

/// A mapping from logical qubits to physical qubits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Map from logical qubit to physical qubit index.
    logical_to_physical: FxHashMap<QubitId, u32>,
    /// Map from physical qubit index to logical qubit.
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Layout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trivial layout (logical qubit i -> physical qubit i).
    pub fn trivial(num_qubits: u32) -> Self {
        let mut layout = Self::new();
        for i in 0..num_qubits {
            layout.add(QubitId(i), i);
        }
        layout
    }

    /// Create a layout from one-line notation: logical `i` sits on
    /// physical `mapping[i]`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_mapping(mapping: &[u32]) -> Self {
        let mut layout = Self::new();
        for (logical, &physical) in mapping.iter().enumerate() {
            layout.add(QubitId(logical as u32), physical);
        }
        layout
    }

    /// Add a mapping from logical to physical qubit.
    ///
    /// Conflicting entries in either direction are dropped so both maps stay
    /// consistent.
    pub fn add(&mut self, logical: QubitId, physical: u32) {
        if let Some(&old_logical) = self.physical_to_logical.get(&physical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(&old_physical) = self.logical_to_physical.get(&logical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
    }

    /// Get the physical qubit for a logical qubit.
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit for a physical qubit.
    pub fn get_logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Swap the contents of two physical qubits.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.get(&p1).copied();
        let l2 = self.physical_to_logical.get(&p2).copied();

        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        } else {
            self.physical_to_logical.remove(&p2);
        }

        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        } else {
            self.physical_to_logical.remove(&p1);
        }
    }

    /// Get the number of mapped qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Iterate over (logical, physical) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.logical_to_physical.iter().map(|(&l, &p)| (l, p))
    }
}

/// Device connectivity graph.
///
/// Nodes are physical qubits `0..num_qubits`; edges are undirected pairs
/// that support a two-qubit gate. A coupling map is built once per
/// benchmark package and shared read-only afterwards.
///
/// ## Performance
///
/// Factory methods precompute an all-pairs distance matrix by BFS from each
/// node, so `distance()` is O(1) and `shortest_path()` is O(distance).
///
/// ## Deserialization
///
/// After deserialization, call [`rebuild_caches()`](Self::rebuild_caches) to
/// recompute the adjacency list and distance/predecessor matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingMap {
    /// Display name of the architecture.
    name: String,
    /// List of connected qubit pairs (bidirectional).
    edges: Vec<(u32, u32)>,
    /// Number of physical qubits.
    num_qubits: u32,
    #[serde(skip)]
    adjacency: FxHashMap<u32, Vec<u32>>,
    /// `dist_matrix[from][to]` is the shortest-path distance, or `u32::MAX`
    /// if unreachable.
    #[serde(skip)]
    dist_matrix: Vec<Vec<u32>>,
    /// `pred_matrix[from][to]` is the node before `to` on a shortest path.
    #[serde(skip)]
    pred_matrix: Vec<Vec<u32>>,
}

impl PartialEq for CouplingMap {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits
            && self.edges.len() == other.edges.len()
            && self.edges.iter().all(|&(a, b)| other.has_edge(a, b))
    }
}

impl CouplingMap {
    /// Create a new coupling map with the given number of qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            name: "graph".into(),
            edges: vec![],
            num_qubits,
            adjacency: FxHashMap::default(),
            dist_matrix: vec![],
            pred_matrix: vec![],
        }
    }

    /// Build a coupling map from an edge list, re-indexing the nodes that
    /// appear in it consecutively (in ascending order of their old ids).
    ///
    /// Duplicate edges are dropped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_edges(edges: &[(u32, u32)]) -> Self {
        let mut old_nodes: Vec<u32> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        old_nodes.sort_unstable();
        old_nodes.dedup();
        let index: FxHashMap<u32, u32> = old_nodes
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new as u32))
            .collect();

        let mut map = Self::new(old_nodes.len() as u32);
        for &(a, b) in edges {
            map.add_edge(index[&a], index[&b]);
        }
        map.precompute_distances();
        map
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an edge between two qubits (bidirectional).
    ///
    /// Duplicate edges (including reversed pairs) are silently ignored.
    pub fn add_edge(&mut self, q1: u32, q2: u32) {
        if self.has_edge(q1, q2) {
            return;
        }
        self.edges.push((q1, q2));
        self.adjacency.entry(q1).or_default().push(q2);
        if q1 != q2 {
            self.adjacency.entry(q2).or_default().push(q1);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn precompute_distances(&mut self) {
        let n = self.num_qubits as usize;
        self.dist_matrix = vec![vec![u32::MAX; n]; n];
        self.pred_matrix = vec![vec![u32::MAX; n]; n];

        for src in 0..n {
            self.dist_matrix[src][src] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(src as u32);

            while let Some(current) = queue.pop_front() {
                let cur = current as usize;
                for &neighbor in self.adjacency.get(&current).into_iter().flatten() {
                    let nb = neighbor as usize;
                    if nb < n && self.dist_matrix[src][nb] == u32::MAX {
                        self.dist_matrix[src][nb] = self.dist_matrix[src][cur] + 1;
                        self.pred_matrix[src][nb] = current;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    /// Rebuild the adjacency list and distance/predecessor matrices from the
    /// edge list.
    pub fn rebuild_caches(&mut self) {
        self.adjacency.clear();
        for &(q1, q2) in &self.edges {
            self.adjacency.entry(q1).or_default().push(q2);
            if q1 != q2 {
                self.adjacency.entry(q2).or_default().push(q1);
            }
        }
        self.precompute_distances();
    }

    /// Check if two qubits share an edge.
    #[inline]
    pub fn has_edge(&self, q1: u32, q2: u32) -> bool {
        self.adjacency
            .get(&q1)
            .is_some_and(|neighbors| neighbors.contains(&q2))
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the coupling edges.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Get neighbors of a qubit.
    pub fn neighbors(&self, qubit: u32) -> impl Iterator<Item = u32> + '_ {
        self.adjacency
            .get(&qubit)
            .map(|v| v.iter().copied())
            .into_iter()
            .flatten()
    }

    /// Number of edges incident to a qubit.
    pub fn degree(&self, qubit: u32) -> usize {
        self.adjacency.get(&qubit).map_or(0, Vec::len)
    }

    /// Qubits touched by at least one edge, in ascending order.
    pub fn active_qubits(&self) -> Vec<u32> {
        let mut nodes: Vec<u32> = self.adjacency.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    /// The subgraph made of `edges`, keeping the device indexing.
    ///
    /// Pairs that are not edges of this map are ignored.
    pub fn induced_subgraph(&self, edges: &[(u32, u32)]) -> Self {
        let mut sub = Self::new(self.num_qubits);
        sub.name.clone_from(&self.name);
        for &(a, b) in edges {
            if self.has_edge(a, b) {
                sub.add_edge(a, b);
            }
        }
        sub.precompute_distances();
        sub
    }

    /// Whether the qubits touched by edges form a single connected component.
    pub fn is_connected_graph(&self) -> bool {
        let active = self.active_qubits();
        let Some(&start) = active.first() else {
            return true;
        };
        let mut seen = vec![false; self.num_qubits.max(start + 1) as usize];
        let mut queue = VecDeque::from([start]);
        seen[start as usize] = true;
        let mut reached = 1usize;
        while let Some(current) = queue.pop_front() {
            for nb in self.neighbors(current) {
                let slot = nb as usize;
                if slot < seen.len() && !seen[slot] {
                    seen[slot] = true;
                    reached += 1;
                    queue.push_back(nb);
                }
            }
        }
        reached == active.len()
    }

    /// Check that this is a connected simple graph on all of its qubits.
    pub fn validate(&self) -> CompileResult<()> {
        if self.edges.is_empty() {
            return Err(CompileError::InvalidCouplingMap(format!(
                "'{}' has no edges",
                self.name
            )));
        }
        if let Some(&(q, _)) = self.edges.iter().find(|(a, b)| a == b) {
            return Err(CompileError::InvalidCouplingMap(format!(
                "'{}' has a self-loop on qubit {q}",
                self.name
            )));
        }
        if let Some(&(a, b)) = self
            .edges
            .iter()
            .find(|&&(a, b)| a >= self.num_qubits || b >= self.num_qubits)
        {
            return Err(CompileError::InvalidCouplingMap(format!(
                "'{}' has edge ({a}, {b}) outside of {} qubits",
                self.name, self.num_qubits
            )));
        }
        if self.active_qubits().len() != self.num_qubits as usize || !self.is_connected_graph() {
            return Err(CompileError::InvalidCouplingMap(format!(
                "'{}' is not connected",
                self.name
            )));
        }
        Ok(())
    }

    /// O(1) shortest-path distance lookup using the precomputed matrix.
    /// Falls back to BFS if the matrix has not been precomputed.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        if from == to {
            return Some(0);
        }

        let (f, t) = (from as usize, to as usize);
        if f < self.dist_matrix.len() && t < self.dist_matrix[f].len() {
            let d = self.dist_matrix[f][t];
            return if d == u32::MAX { None } else { Some(d) };
        }

        self.distance_bfs(from, to)
    }

    /// Reconstruct shortest path from→to using the predecessor matrix.
    /// Returns `None` if no path exists.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        if from == to {
            return Some(vec![from]);
        }

        let (f, t) = (from as usize, to as usize);
        if f >= self.pred_matrix.len() || t >= self.pred_matrix[f].len() {
            return None;
        }

        if self.dist_matrix[f][t] == u32::MAX {
            return None;
        }

        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let pred = self.pred_matrix[f][current as usize];
            if pred == u32::MAX {
                return None;
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Some(path)
    }

    fn distance_bfs(&self, from: u32, to: u32) -> Option<u32> {
        let mut visited = FxHashMap::default();
        let mut queue = VecDeque::new();
        queue.push_back((from, 0u32));
        visited.insert(from, 0u32);

        while let Some((current, dist)) = queue.pop_front() {
            for &neighbor in self.adjacency.get(&current).into_iter().flatten() {
                if neighbor == to {
                    return Some(dist + 1);
                }
                if let std::collections::hash_map::Entry::Vacant(e) = visited.entry(neighbor) {
                    e.insert(dist + 1);
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }

        None
    }

    // =========================================================================
    // Architectures
    // =========================================================================

    /// Create a linear coupling map (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        let mut map = Self::new(n).with_name(format!("line({n})"));
        for i in 0..n.saturating_sub(1) {
            map.add_edge(i, i + 1);
        }
        map.precompute_distances();
        map
    }

    /// Create a ring coupling map (a cycle over `n` qubits).
    pub fn ring(n: u32) -> Self {
        let mut map = Self::new(n).with_name(format!("ring({n})"));
        for i in 0..n {
            map.add_edge(i, (i + 1) % n);
        }
        map.precompute_distances();
        map
    }

    /// Create a star topology (center qubit connected to all others).
    pub fn star(n: u32) -> Self {
        let mut map = Self::new(n).with_name(format!("star({n})"));
        for i in 1..n {
            map.add_edge(0, i);
        }
        map.precompute_distances();
        map
    }

    /// Create a `rows x cols` grid. Qubit `r * cols + c` sits at row `r`,
    /// column `c`.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut map = Self::new(rows * cols).with_name(format!("grid({rows}, {cols})"));
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    map.add_edge(q, q + 1);
                }
                if r + 1 < rows {
                    map.add_edge(q, q + cols);
                }
            }
        }
        map.precompute_distances();
        map
    }

    /// Create a fully connected coupling map.
    pub fn full(n: u32) -> Self {
        let mut map = Self::new(n).with_name(format!("full({n})"));
        for i in 0..n {
            for j in (i + 1)..n {
                map.add_edge(i, j);
            }
        }
        map.precompute_distances();
        map
    }

    /// IBM Q Tokyo (20 qubits).
    pub fn tokyo() -> Self {
        Self::from_edges(&TOKYO_EDGES).with_name("tokyo")
    }

    /// IBM Q Rochester (53 qubits).
    pub fn rochester() -> Self {
        Self::from_edges(&ROCHESTER_EDGES).with_name("rochester")
    }

    /// Google Sycamore with all 54 qubits.
    pub fn sycamore54() -> Self {
        Self::from_edges(&SYCAMORE54_EDGES).with_name("sycamore54")
    }

    /// Google Sycamore as deployed (53 qubits): qubit 3 removed, the rest
    /// re-indexed consecutively.
    pub fn sycamore() -> Self {
        let edges: Vec<(u32, u32)> = SYCAMORE54_EDGES
            .iter()
            .copied()
            .filter(|&(a, b)| a != 3 && b != 3)
            .collect();
        Self::from_edges(&edges).with_name("sycamore")
    }

    /// Resolve an architecture by name and validate it.
    ///
    /// Named devices are `tokyo`, `rochester`, `sycamore54` and `sycamore`.
    /// Parametric families take their size in parentheses: `line(5)`,
    /// `ring(5)`, `star(5)`, `full(5)` and `grid(3, 4)`.
    pub fn from_name(name: &str) -> CompileResult<Self> {
        let spec: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let unknown = || CompileError::UnknownArchitecture(name.to_string());

        let (family, args) = match spec.split_once('(') {
            Some((family, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                let args = inner
                    .split(',')
                    .map(str::parse::<u32>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| unknown())?;
                (family.to_string(), args)
            }
            None => (spec, vec![]),
        };

        let map = match (family.as_str(), args.as_slice()) {
            ("tokyo", []) => Self::tokyo(),
            ("rochester", []) => Self::rochester(),
            ("sycamore54", []) => Self::sycamore54(),
            ("sycamore", []) => Self::sycamore(),
            ("line" | "linear", [n]) => Self::linear(*n),
            ("ring", [n]) => Self::ring(*n),
            ("star", [n]) => Self::star(*n),
            ("full", [n]) => Self::full(*n),
            ("grid", [rows, cols]) => Self::grid(*rows, *cols),
            _ => return Err(unknown()),
        };
        map.validate()?;
        Ok(map)
    }
}

const TOKYO_EDGES: [(u32, u32); 43] = [
    (0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (1, 6), (1, 7), (2, 6),
    (2, 7), (3, 8), (3, 9), (4, 8), (4, 9), (5, 6), (6, 7), (7, 8),
    (8, 9), (5, 10), (5, 11), (6, 10), (6, 11), (7, 12), (7, 13), (8, 12),
    (8, 13), (9, 14), (10, 11), (11, 12), (12, 13), (13, 14), (10, 15), (11, 16),
    (11, 17), (12, 16), (12, 17), (13, 18), (13, 19), (14, 18), (14, 19), (15, 16),
    (16, 17), (17, 18), (18, 19),
];

const ROCHESTER_EDGES: [(u32, u32); 58] = [
    (0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (4, 6), (5, 9), (6, 13),
    (7, 8), (8, 9), (9, 10), (10, 11), (11, 12), (12, 13), (13, 14), (14, 15),
    (7, 16), (11, 17), (15, 18), (16, 19), (17, 23), (18, 27), (19, 20), (20, 21),
    (21, 22), (22, 23), (23, 24), (24, 25), (25, 26), (26, 27), (21, 28), (25, 29),
    (28, 32), (29, 36), (30, 31), (31, 32), (32, 33), (33, 34), (34, 35), (35, 36),
    (36, 37), (37, 38), (30, 39), (34, 40), (38, 41), (39, 42), (40, 46), (41, 50),
    (42, 43), (43, 44), (44, 45), (45, 46), (46, 47), (47, 48), (48, 49), (49, 50),
    (44, 51), (48, 52),
];

const SYCAMORE54_EDGES: [(u32, u32); 88] = [
    (0, 6), (1, 6), (1, 7), (2, 7), (2, 8), (3, 8), (3, 9), (4, 9),
    (4, 10), (5, 10), (5, 11), (6, 12), (6, 13), (7, 13), (7, 14), (8, 14),
    (8, 15), (9, 15), (9, 16), (10, 16), (10, 17), (11, 17), (12, 18), (13, 18),
    (13, 19), (14, 19), (14, 20), (15, 20), (15, 21), (16, 21), (16, 22), (17, 22),
    (17, 23), (18, 24), (18, 25), (19, 25), (19, 26), (20, 26), (20, 27), (21, 27),
    (21, 28), (22, 28), (22, 29), (23, 29), (24, 30), (25, 30), (25, 31), (26, 31),
    (26, 32), (27, 32), (27, 33), (28, 33), (28, 34), (29, 34), (29, 35), (30, 36),
    (30, 37), (31, 37), (31, 38), (32, 38), (32, 39), (33, 39), (33, 40), (34, 40),
    (34, 41), (35, 41), (36, 42), (37, 42), (37, 43), (37, 43), (38, 44), (39, 44),
    (39, 45), (40, 45), (40, 46), (41, 46), (41, 47), (42, 48), (42, 49), (43, 49),
    (43, 50), (44, 50), (44, 51), (45, 51), (45, 52), (46, 52), (46, 53), (47, 53),
];

/// Properties shared between compilation passes.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `layout` | [`Layout`] | Logical-to-physical qubit mapping |
/// | `coupling_map` | [`CouplingMap`] | Device connectivity graph |
///
/// Passes can store arbitrary data using the type-safe [`insert`](Self::insert)
/// and [`get`](Self::get) methods. Each type can have at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Qubit layout mapping (logical → physical).
    ///
    /// Installed by layout passes; routing keeps it up to date as it swaps.
    pub layout: Option<Layout>,

    /// Target coupling map defining allowed two-qubit interactions.
    pub coupling_map: Option<CouplingMap>,

    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target coupling map.
    #[must_use]
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.coupling_map = Some(coupling_map);
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_mapping() {
        let layout = Layout::from_mapping(&[2, 0, 1]);
        assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        assert_eq!(layout.get_logical(0), Some(QubitId(1)));
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn test_layout_swap() {
        let mut layout = Layout::trivial(3);
        layout.swap(0, 2);

        assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        assert_eq!(layout.get_physical(QubitId(2)), Some(0));
        assert_eq!(layout.get_logical(0), Some(QubitId(2)));
        assert_eq!(layout.get_logical(2), Some(QubitId(0)));
    }

    #[test]
    fn test_coupling_map_linear() {
        let map = CouplingMap::linear(5);
        assert!(map.has_edge(0, 1));
        assert!(map.has_edge(1, 0));
        assert!(!map.has_edge(0, 2));
        assert_eq!(map.distance(0, 4), Some(4));
        assert_eq!(map.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
        assert_eq!(map.name(), "line(5)");
    }

    #[test]
    fn test_coupling_map_ring_and_grid() {
        let ring = CouplingMap::ring(5);
        assert_eq!(ring.num_edges(), 5);
        assert!(ring.has_edge(4, 0));
        assert_eq!(ring.distance(0, 3), Some(2));

        let grid = CouplingMap::grid(2, 3);
        assert_eq!(grid.num_qubits(), 6);
        assert_eq!(grid.num_edges(), 7);
        assert!(grid.has_edge(1, 4));
        assert!(!grid.has_edge(2, 3));
        grid.validate().unwrap();
    }

    #[test]
    fn test_coupling_map_star() {
        let map = CouplingMap::star(5);
        assert!(map.has_edge(0, 4));
        assert!(!map.has_edge(1, 2));
        assert_eq!(map.distance(1, 2), Some(2));
        assert_eq!(map.degree(0), 4);
    }

    #[test]
    fn test_named_devices() {
        let tokyo = CouplingMap::tokyo();
        assert_eq!((tokyo.num_qubits(), tokyo.num_edges()), (20, 43));
        tokyo.validate().unwrap();

        let rochester = CouplingMap::rochester();
        assert_eq!((rochester.num_qubits(), rochester.num_edges()), (53, 58));
        rochester.validate().unwrap();

        let sycamore54 = CouplingMap::sycamore54();
        assert_eq!((sycamore54.num_qubits(), sycamore54.num_edges()), (54, 87));
        sycamore54.validate().unwrap();

        let sycamore = CouplingMap::sycamore();
        assert_eq!((sycamore.num_qubits(), sycamore.num_edges()), (53, 85));
        sycamore.validate().unwrap();
    }

    #[test]
    fn test_from_edges_reindexes() {
        let map = CouplingMap::from_edges(&[(10, 20), (20, 30), (30, 10), (20, 10)]);
        assert_eq!(map.num_qubits(), 3);
        assert_eq!(map.num_edges(), 3);
        assert!(map.has_edge(0, 1));
        assert!(map.has_edge(2, 0));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CouplingMap::from_name("Tokyo").unwrap().num_qubits(), 20);
        assert_eq!(CouplingMap::from_name("grid(3, 4)").unwrap().num_qubits(), 12);
        assert_eq!(CouplingMap::from_name("ring(5)").unwrap(), CouplingMap::ring(5));
        assert!(matches!(
            CouplingMap::from_name("heavyhex"),
            Err(CompileError::UnknownArchitecture(_))
        ));
        assert!(matches!(
            CouplingMap::from_name("ring(1)"),
            Err(CompileError::InvalidCouplingMap(_))
        ));
    }

    #[test]
    fn test_validate_rejects_disconnected() {
        let mut map = CouplingMap::new(4);
        map.add_edge(0, 1);
        map.add_edge(2, 3);
        map.rebuild_caches();
        assert!(!map.is_connected_graph());
        assert!(map.validate().is_err());
    }

    #[test]
    fn test_induced_subgraph_keeps_indexing() {
        let tokyo = CouplingMap::tokyo();
        let sub = tokyo.induced_subgraph(&[(5, 6), (6, 7), (0, 19)]);
        assert_eq!(sub.num_qubits(), 20);
        assert_eq!(sub.num_edges(), 2);
        assert_eq!(sub.active_qubits(), vec![5, 6, 7]);
        assert!(sub.is_connected_graph());
        assert_eq!(sub.distance(5, 7), Some(2));
        assert_eq!(sub.distance(5, 0), None);
    }

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(42)));
        assert_eq!(props.get::<CustomData>(), None);
    }
}
