//! Make repeatable UDDF collections uniformly sequences.
//!
//! A generic XML-to-tree parser cannot tell a collection with one element
//! from a plain child, so `repetitiongroup` and `dive` arrive either as a
//! mapping or as a sequence. After normalization they are always sequences.

use tracing::{debug, warn};
use uddf_units::{convert_tree, UnitSystem};
use uddf_xml::{Mapping, Node};

pub const ROOT: &str = "uddf";
pub const PROFILE_DATA: &str = "profiledata";
pub const REPETITION_GROUP: &str = "repetitiongroup";
pub const DIVE: &str = "dive";

/// Collect a possibly singular value into a sequence.
///
/// Absent becomes empty, a sequence is copied as is, anything else becomes
/// a one-element sequence.
pub fn ensure_sequence(node: Option<&Node>) -> Vec<Node> {
    match node {
        None => Vec::new(),
        Some(Node::Sequence(items)) => items.clone(),
        Some(single) => vec![single.clone()],
    }
}

fn wrap_in_sequence(mapping: &mut Mapping, key: &str) {
    match mapping.get_mut(key) {
        Some(Node::Sequence(_)) => {}
        Some(slot) => {
            debug!(key, "wrapping singular collection");
            let single = std::mem::replace(slot, Node::Sequence(Vec::new()));
            *slot = Node::Sequence(vec![single]);
        }
        None => {
            debug!(key, "adding empty collection");
            mapping.insert(key, Node::Sequence(Vec::new()));
        }
    }
}

fn profile_data_mut(tree: &mut Node) -> Option<&mut Mapping> {
    tree.as_mapping_mut()?
        .get_mut(ROOT)?
        .as_mapping_mut()?
        .get_mut(PROFILE_DATA)?
        .as_mapping_mut()
}

fn dives_mut(tree: &mut Node) -> impl Iterator<Item = &mut Node> {
    profile_data_mut(tree)
        .and_then(|profile| match profile.get_mut(REPETITION_GROUP) {
            Some(Node::Sequence(groups)) => Some(groups),
            _ => None,
        })
        .into_iter()
        .flatten()
        .filter_map(|group| match group.as_mapping_mut()?.get_mut(DIVE) {
            Some(Node::Sequence(dives)) => Some(dives),
            _ => None,
        })
        .flatten()
}

/// Return a copy of `tree` where `uddf.profiledata.repetitiongroup` and every
/// group's `dive` are sequences. Trees without `uddf.profiledata` are copied
/// unchanged; the input is never modified.
pub fn normalize(tree: &Node) -> Node {
    let mut normalized = tree.clone();
    match profile_data_mut(&mut normalized) {
        Some(profile) => {
            wrap_in_sequence(profile, REPETITION_GROUP);
            if let Some(Node::Sequence(groups)) = profile.get_mut(REPETITION_GROUP) {
                for group in groups {
                    match group.as_mapping_mut() {
                        Some(group) => wrap_in_sequence(group, DIVE),
                        None => warn!("repetition group is not an element, leaving as is"),
                    }
                }
            }
        }
        None => debug!("no profile data to normalize"),
    }
    normalized
}

/// Normalize `tree`, then convert every dive to `unit`. Content outside the
/// dives is left as parsed.
pub fn convert_dives(tree: &Node, unit: UnitSystem) -> Node {
    let mut converted = normalize(tree);
    let mut count = 0usize;
    for dive in dives_mut(&mut converted) {
        *dive = convert_tree(dive, unit);
        count += 1;
    }
    debug!(dives = count, %unit, "converted dives");
    converted
}
