use crate::resources::ResourceRef;
use serde::{Deserialize, Serialize};

/// One link of a raw evolution chain as the upstream catalog nests it.
///
/// This is the immutable input to evolution resolution: each link only carries a
/// species reference, so every node still needs its species resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: ResourceRef,
    pub evolves_to: Vec<ChainLink>,
}

/// The parts of a species record the resolver needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub id: u32,
    pub name: String,
    pub evolution_chain_url: Option<String>, // Absent for a handful of event species
}

/// A resolved evolution tree. `children` is empty at a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub children: Vec<EvolutionNode>,
}

impl EvolutionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in the tree, counting this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(EvolutionNode::depth).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(EvolutionNode::node_count).sum::<usize>()
    }

    /// Pre-order walk of the species ids in the tree.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }

    pub fn find(&self, id: u32) -> Option<&EvolutionNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
