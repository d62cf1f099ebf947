//! Frequency tree construction and code generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A node of the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HuffmanNode {
    Leaf {
        value: u8,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn frequency(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }
}

/// Huffman tree over byte values. An empty tree encodes empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanTree {
    root: Option<HuffmanNode>,
}

impl HuffmanTree {
    /// Count byte occurrences in `data`.
    pub fn frequencies(data: &[u8]) -> [u64; 256] {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[usize::from(byte)] += 1;
        }
        counts
    }

    pub fn from_data(data: &[u8]) -> Self {
        Self::from_frequencies(&Self::frequencies(data))
    }

    /// Build the tree from a frequency table.
    ///
    /// Leaves start in ascending byte order. Each round stable-sorts the
    /// working list by frequency, merges the first two entries (first on the
    /// left) and appends the parent at the end.
    pub fn from_frequencies(frequencies: &[u64; 256]) -> Self {
        let mut nodes: Vec<HuffmanNode> = (0..=u8::MAX)
            .zip(frequencies.iter())
            .filter(|&(_, &frequency)| frequency > 0)
            .map(|(value, &frequency)| HuffmanNode::Leaf { value, frequency })
            .collect();

        debug!(symbols = nodes.len(), "Building Huffman tree");

        while nodes.len() > 1 {
            nodes.sort_by_key(HuffmanNode::frequency);
            let left = nodes.remove(0);
            let right = nodes.remove(0);
            nodes.push(HuffmanNode::Internal {
                frequency: left.frequency() + right.frequency(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Self { root: nodes.pop() }
    }

    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Root-to-leaf paths for every leaf, `false` for left and `true` for
    /// right. A lone leaf gets the one-bit code `[false]`.
    pub fn generate_codes(&self) -> BTreeMap<u8, Vec<bool>> {
        let mut codes = BTreeMap::new();
        match &self.root {
            None => {}
            Some(HuffmanNode::Leaf { value, .. }) => {
                codes.insert(*value, vec![false]);
            }
            Some(root) => collect_codes(root, &mut Vec::new(), &mut codes),
        }
        codes
    }
}

fn collect_codes(node: &HuffmanNode, path: &mut Vec<bool>, codes: &mut BTreeMap<u8, Vec<bool>>) {
    match node {
        HuffmanNode::Leaf { value, .. } => {
            codes.insert(*value, path.clone());
        }
        HuffmanNode::Internal { left, right, .. } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}
