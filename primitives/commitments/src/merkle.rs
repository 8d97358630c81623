// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2023 Snowfork <hello@snowfork.com>
//! Binary merkle tree over the messages committed in one block.
//!
//! Leaves are hashes of the SCALE-encoded messages, in commitment order.
//! Layers are folded pairwise; an unpaired rightmost node is promoted to the
//! next layer unchanged. Proofs are positional: a proof is only meaningful
//! for the leaf index it was generated for.

use alloc::vec::Vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_core::H256;
use sp_runtime::{traits::Hash, RuntimeDebug};

/// Merkle inclusion proof for a single committed message.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct MerkleProof {
	/// Root of the tree the proof was generated from.
	pub root: H256,
	/// Sibling hashes on the path from the leaf to the root, leaf layer
	/// first. Layers where the node is an unpaired rightmost node contribute
	/// no sibling.
	pub proof: Vec<H256>,
	/// Number of leaves in the tree.
	pub number_of_leaves: u64,
	/// Zero-based position of the proven leaf in the leaf layer.
	pub leaf_index: u64,
	/// Hash of the proven leaf.
	pub leaf: H256,
}

/// Compute the merkle root over the given leaves.
///
/// Returns the zero hash for an empty leaf set; blocks without messages
/// carry no commitment at all, so this case never reaches the chain.
pub fn merkle_root<H, I>(leaves: I) -> H256
where
	H: Hash<Output = H256>,
	I: IntoIterator,
	I::Item: AsRef<[u8]>,
{
	let mut layer: Vec<H256> =
		leaves.into_iter().map(|leaf| <H as Hash>::hash(leaf.as_ref())).collect();
	if layer.is_empty() {
		return H256::default()
	}
	while layer.len() > 1 {
		layer = next_layer::<H>(&layer);
	}
	layer[0]
}

/// Generate an inclusion proof for the leaf at `leaf_index`.
///
/// Returns `None` when the index is out of range.
pub fn merkle_proof<H, I>(leaves: I, leaf_index: u64) -> Option<MerkleProof>
where
	H: Hash<Output = H256>,
	I: IntoIterator,
	I::Item: AsRef<[u8]>,
{
	let mut layer: Vec<H256> =
		leaves.into_iter().map(|leaf| <H as Hash>::hash(leaf.as_ref())).collect();
	let number_of_leaves = layer.len() as u64;
	if leaf_index >= number_of_leaves {
		return None
	}

	let leaf = layer[leaf_index as usize];
	let mut proof = Vec::new();
	let mut index = leaf_index as usize;
	while layer.len() > 1 {
		if index % 2 == 1 {
			proof.push(layer[index - 1]);
		} else if index + 1 < layer.len() {
			proof.push(layer[index + 1]);
		}
		layer = next_layer::<H>(&layer);
		index /= 2;
	}

	Some(MerkleProof { root: layer[0], proof, number_of_leaves, leaf_index, leaf })
}

/// Recompute the root from the proof and compare it against `root`.
///
/// The proof must both fold to `root` and claim `root` itself; a proof that
/// is internally consistent but generated under a different commitment is
/// rejected.
pub fn verify_merkle_leaf<H>(root: H256, proof: &MerkleProof) -> bool
where
	H: Hash<Output = H256>,
{
	if proof.leaf_index >= proof.number_of_leaves {
		return false
	}

	let mut hash = proof.leaf;
	let mut index = proof.leaf_index;
	let mut width = proof.number_of_leaves;
	let mut siblings = proof.proof.iter();
	while width > 1 {
		if index % 2 == 1 {
			match siblings.next() {
				Some(sibling) => hash = combine::<H>(sibling, &hash),
				None => return false,
			}
		} else if index + 1 < width {
			match siblings.next() {
				Some(sibling) => hash = combine::<H>(&hash, sibling),
				None => return false,
			}
		}
		index /= 2;
		width = (width + 1) / 2;
	}

	siblings.next().is_none() && hash == root && proof.root == root
}

fn next_layer<H>(layer: &[H256]) -> Vec<H256>
where
	H: Hash<Output = H256>,
{
	layer
		.chunks(2)
		.map(|pair| if pair.len() == 2 { combine::<H>(&pair[0], &pair[1]) } else { pair[0] })
		.collect()
}

fn combine<H>(left: &H256, right: &H256) -> H256
where
	H: Hash<Output = H256>,
{
	let mut buf = [0u8; 64];
	buf[..32].copy_from_slice(left.as_bytes());
	buf[32..].copy_from_slice(right.as_bytes());
	<H as Hash>::hash(&buf)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::{vec, vec::Vec};
	use sp_runtime::traits::Keccak256;

	fn leaves(count: usize) -> Vec<Vec<u8>> {
		(0..count).map(|i| vec![i as u8; 32 + i]).collect()
	}

	#[test]
	fn proof_verifies_for_every_leaf_and_tree_size() {
		for count in 1..=8 {
			let leaves = leaves(count);
			let root = merkle_root::<Keccak256, _>(leaves.iter());
			for index in 0..count as u64 {
				let proof = merkle_proof::<Keccak256, _>(leaves.iter(), index).unwrap();
				assert_eq!(proof.root, root);
				assert_eq!(proof.number_of_leaves, count as u64);
				assert_eq!(proof.leaf_index, index);
				assert!(
					verify_merkle_leaf::<Keccak256>(root, &proof),
					"proof for leaf {} of {} failed",
					index,
					count,
				);
			}
		}
	}

	#[test]
	fn out_of_range_index_yields_no_proof() {
		let leaves = leaves(3);
		assert!(merkle_proof::<Keccak256, _>(leaves.iter(), 3).is_none());
		assert!(merkle_proof::<Keccak256, _>(Vec::<Vec<u8>>::new(), 0).is_none());
	}

	#[test]
	fn tampered_leaf_fails_verification() {
		let leaves = leaves(5);
		let root = merkle_root::<Keccak256, _>(leaves.iter());
		let mut proof = merkle_proof::<Keccak256, _>(leaves.iter(), 2).unwrap();
		proof.leaf = Keccak256::hash(b"something else");
		assert!(!verify_merkle_leaf::<Keccak256>(root, &proof));
	}

	#[test]
	fn tampered_sibling_fails_verification() {
		let leaves = leaves(6);
		let root = merkle_root::<Keccak256, _>(leaves.iter());
		let mut proof = merkle_proof::<Keccak256, _>(leaves.iter(), 4).unwrap();
		proof.proof[0] = H256::repeat_byte(0xde);
		assert!(!verify_merkle_leaf::<Keccak256>(root, &proof));
	}

	#[test]
	fn proof_against_foreign_root_fails_verification() {
		let leaves = leaves(4);
		let proof = merkle_proof::<Keccak256, _>(leaves.iter(), 1).unwrap();
		let foreign_root = merkle_root::<Keccak256, _>(leaves.iter().skip(1));
		assert!(!verify_merkle_leaf::<Keccak256>(foreign_root, &proof));
	}

	#[test]
	fn truncated_proof_fails_verification() {
		let leaves = leaves(8);
		let root = merkle_root::<Keccak256, _>(leaves.iter());
		let mut proof = merkle_proof::<Keccak256, _>(leaves.iter(), 5).unwrap();
		proof.proof.pop();
		assert!(!verify_merkle_leaf::<Keccak256>(root, &proof));
	}

	#[test]
	fn single_leaf_tree_has_empty_path() {
		let leaves = leaves(1);
		let root = merkle_root::<Keccak256, _>(leaves.iter());
		let proof = merkle_proof::<Keccak256, _>(leaves.iter(), 0).unwrap();
		assert_eq!(proof.leaf, root);
		assert!(proof.proof.is_empty());
		assert!(verify_merkle_leaf::<Keccak256>(root, &proof));
	}
}
