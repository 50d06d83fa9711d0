//! Adjacency graph for a loaded variant.
//!
//! Each entry records a directed edge: (from, from_coast) -> (to, to_coast)
//! with flags for army and fleet passability. Variants describe undirected
//! edges; the loader expands each into two directed entries, so the index is
//! symmetric by construction.
//!
//! Split-coast provinces use coast-specific fleet adjacencies and
//! `Coast::None` for army adjacencies.

use super::province::{Coast, ProvinceId};

/// A single directed adjacency between two provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyEntry {
    pub from: ProvinceId,
    pub from_coast: Coast,
    pub to: ProvinceId,
    pub to_coast: Coast,
    pub army_ok: bool,
    pub fleet_ok: bool,
}

impl AdjacencyEntry {
    /// Returns the entry traversed in the opposite direction.
    pub fn reversed(self) -> Self {
        AdjacencyEntry {
            from: self.to,
            from_coast: self.to_coast,
            to: self.from,
            to_coast: self.from_coast,
            army_ok: self.army_ok,
            fleet_ok: self.fleet_ok,
        }
    }
}

/// Per-province adjacency index for O(neighbors) lookup.
///
/// Entries are sorted by `from` province and each province stores its
/// `(start, end)` offsets into the sorted vec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    entries: Vec<AdjacencyEntry>,
    offsets: Vec<(u32, u32)>,
}

impl AdjacencyIndex {
    /// Builds the index from directed entries over `province_count` provinces.
    pub fn build(mut entries: Vec<AdjacencyEntry>, province_count: usize) -> Self {
        entries.sort_by_key(|a| (a.from, a.to, a.from_coast, a.to_coast));

        let mut offsets = vec![(0u32, 0u32); province_count];
        let mut i = 0;
        for (p, slot) in offsets.iter_mut().enumerate() {
            let start = i;
            while i < entries.len() && entries[i].from.index() == p {
                i += 1;
            }
            *slot = (start as u32, i as u32);
        }

        AdjacencyIndex { entries, offsets }
    }

    /// Returns every directed entry.
    pub fn entries(&self) -> &[AdjacencyEntry] {
        &self.entries
    }

    /// Returns the adjacency entries originating from the given province.
    #[inline]
    pub fn adj_from(&self, prov: ProvinceId) -> &[AdjacencyEntry] {
        match self.offsets.get(prov.index()) {
            Some(&(start, end)) => &self.entries[start as usize..end as usize],
            None => &[],
        }
    }

    /// Returns true if a unit of the given kind can move from `src` to `dst`,
    /// honouring coast specifiers when both sides give one.
    pub fn is_adjacent(
        &self,
        src: ProvinceId,
        src_coast: Coast,
        dst: ProvinceId,
        dst_coast: Coast,
        is_fleet: bool,
    ) -> bool {
        self.adj_from(src).iter().any(|adj| {
            adj.to == dst
                && passable(adj, is_fleet)
                && coast_matches(src_coast, adj.from_coast)
                && coast_matches(dst_coast, adj.to_coast)
        })
    }

    /// Returns all coasts at the destination reachable by fleet from the given source and coast.
    pub fn fleet_coasts_to(&self, src: ProvinceId, src_coast: Coast, dst: ProvinceId) -> Vec<Coast> {
        let mut coasts = Vec::new();
        for adj in self.adj_from(src) {
            if adj.to != dst || !adj.fleet_ok || !coast_matches(src_coast, adj.from_coast) {
                continue;
            }
            if !coasts.contains(&adj.to_coast) {
                coasts.push(adj.to_coast);
            }
        }
        coasts
    }

    /// Returns all provinces adjacent to the given province for the given unit kind.
    pub fn provinces_adjacent_to(&self, prov: ProvinceId, coast: Coast, is_fleet: bool) -> Vec<ProvinceId> {
        let mut result = Vec::new();
        for adj in self.adj_from(prov) {
            if !passable(adj, is_fleet) || !coast_matches(coast, adj.from_coast) {
                continue;
            }
            if !result.contains(&adj.to) {
                result.push(adj.to);
            }
        }
        result
    }
}

fn passable(adj: &AdjacencyEntry, is_fleet: bool) -> bool {
    if is_fleet {
        adj.fleet_ok
    } else {
        adj.army_ok
    }
}

/// A wildcard coast on either side matches any coast.
fn coast_matches(wanted: Coast, edge: Coast) -> bool {
    wanted == Coast::None || edge == Coast::None || wanted == edge
}
