//! Co-location groups: connected components of the within-threshold graph.
//!
//! Two sites share a group when a chain of hops, each no longer than the
//! threshold, links them. Groups are therefore transitive and can be much
//! wider than the threshold itself.

use sha2::{Digest, Sha256};
use sitescope_core::{Result, SiteError};
use sitescope_geo::SpatialIndex;
use std::collections::HashMap;

/// Number of hex digits kept from the group digest
const GROUP_ID_HEX_LEN: usize = 16;

/// Undirected proximity graph over indexed sites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProximityGraph {
    adjacency: Vec<Vec<usize>>,
}

impl ProximityGraph {
    /// Connect every pair of sites no more than `threshold_m` meters apart.
    ///
    /// Edges are inserted in both directions, so adjacency stays symmetric
    /// even where a boundary query is not. A threshold that is not positive
    /// yields a graph with no edges.
    pub fn build(index: &SpatialIndex, threshold_m: f64) -> Self {
        let mut adjacency = vec![Vec::new(); index.len()];

        if threshold_m > 0.0 {
            let neighbors = index.query_radius(threshold_m / 1000.0);
            for (i, list) in neighbors.into_iter().enumerate() {
                for j in list.into_iter().filter(|&j| j != i) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
            for list in &mut adjacency {
                list.sort_unstable();
                list.dedup();
            }
        }

        Self { adjacency }
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Sorted neighbors of a node, excluding the node itself
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Each undirected edge once, as `(smaller, larger)`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, list)| {
            list.iter().copied().filter(move |&j| j > i).map(move |j| (i, j))
        })
    }
}

/// Disjoint-set forest with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self { parent: (0..size).collect(), rank: vec![0; size] }
    }

    /// Root of the set containing `x`
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing `x` and `y`; false if already merged
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let px = self.find(x);
        let py = self.find(y);

        if px == py {
            return false;
        }

        // Union by rank
        if self.rank[px] < self.rank[py] {
            self.parent[px] = py;
        } else if self.rank[px] > self.rank[py] {
            self.parent[py] = px;
        } else {
            self.parent[py] = px;
            self.rank[px] += 1;
        }

        true
    }
}

/// Stable identifier of a group of sites.
///
/// Member ids are sorted by bytes and hashed with SHA-256, each prefixed by its
/// length; the id is the first 16 hex digits of the digest. The result depends
/// only on the multiset of ids, never on row order or the process, so two
/// groups made of the same repeated ids get the same id.
pub fn group_id_for<S: AsRef<str>>(members: &[S]) -> String {
    let mut sorted: Vec<&str> = members.iter().map(|id| id.as_ref()).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    for id in sorted {
        hasher.update((id.len() as u64).to_le_bytes());
        hasher.update(id.as_bytes());
    }

    hasher
        .finalize()
        .iter()
        .take(GROUP_ID_HEX_LEN / 2)
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Group assignment for every site, in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoLocationGroups {
    pub group_ids: Vec<String>,
    pub group_sizes: Vec<usize>,
    count: usize,
}

impl CoLocationGroups {
    /// Number of distinct groups (connected components)
    pub fn group_count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.group_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_ids.is_empty()
    }
}

/// Partition indexed sites into co-location groups.
///
/// `site_ids` must line up with the points the index was built from.
pub fn find_groups<S: AsRef<str>>(
    index: &SpatialIndex,
    site_ids: &[S],
    threshold_m: f64,
) -> Result<CoLocationGroups> {
    if site_ids.len() != index.len() {
        return Err(SiteError::invalid_parameter(
            "site_ids",
            format!("expected {} ids, got {}", index.len(), site_ids.len()),
        ));
    }

    let graph = ProximityGraph::build(index, threshold_m);
    let mut sets = UnionFind::new(graph.len());
    for (i, j) in graph.edges() {
        sets.union(i, j);
    }

    let roots: Vec<usize> = (0..graph.len()).map(|i| sets.find(i)).collect();

    let mut members: HashMap<usize, Vec<&str>> = HashMap::new();
    for (i, &root) in roots.iter().enumerate() {
        members.entry(root).or_default().push(site_ids[i].as_ref());
    }

    let labels: HashMap<usize, (String, usize)> = members
        .into_iter()
        .map(|(root, ids)| (root, (group_id_for(&ids), ids.len())))
        .collect();

    let (group_ids, group_sizes): (Vec<String>, Vec<usize>) = roots
        .iter()
        .map(|root| {
            let (id, size) = &labels[root];
            (id.clone(), *size)
        })
        .unzip();

    tracing::debug!(
        sites = graph.len(),
        edges = graph.edge_count(),
        groups = labels.len(),
        "Computed co-location groups"
    );

    Ok(CoLocationGroups { group_ids, group_sizes, count: labels.len() })
}
