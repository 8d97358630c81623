// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2023 Snowfork <hello@snowfork.com>
//! Primitives of the outbound commitment queue.
//!
//! A parachain block that emits at least one outbound message commits to the
//! full message set with a single merkle root, embedded in the block header
//! digest. This crate holds the data model shared by the runtime side and the
//! off-chain relayer: the committed message type, the merkle tree used to
//! build and verify per-message inclusion proofs, and the digest item codec.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod digest;
pub mod merkle;

pub use digest::{extract_commitment, CustomDigestItem, DigestError};
pub use merkle::{merkle_proof, merkle_root, verify_merkle_leaf, MerkleProof};

use alloc::vec::Vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_core::H256;
use sp_runtime::{traits::BlakeTwo256, RuntimeDebug};

/// Block number used by both the source parachain and the relay chain.
pub type BlockNumber = u32;

/// Nonce of an outbound message. Strictly increasing per channel, assigned at
/// emission.
pub type MessageNonce = u64;

/// Header of the source parachain.
pub type Header = sp_runtime::generic::Header<BlockNumber, BlakeTwo256>;

/// Identifier of a message channel.
///
/// A channel is an independently-nonced message lane between a fixed
/// source/destination pair. Nonces on different channels are unrelated.
#[derive(
	Encode, Decode, TypeInfo, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, RuntimeDebug,
)]
pub struct ChannelId(pub u32);

/// Identifier of a parachain registered at the relay chain.
#[derive(
	Encode, Decode, TypeInfo, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, RuntimeDebug,
)]
pub struct ParaId(pub u32);

/// Raw, SCALE-encoded parachain head as stored by the relay chain.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct HeadData(pub Vec<u8>);

impl HeadData {
	/// Decode the head data into a parachain header.
	pub fn decode_header(&self) -> Result<Header, codec::Error> {
		Header::decode(&mut &self.0[..])
	}
}

/// Message committed by the outbound queue.
///
/// Immutable once included in a block commitment. The payload is opaque to
/// the relayer; it is dispatched by the destination chain gateway.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct OutboundQueueMessage {
	/// Channel the message was emitted on.
	pub origin: ChannelId,
	/// Nonce assigned to the message at emission.
	#[codec(compact)]
	pub nonce: MessageNonce,
	/// Opaque payload, pre-encoded for the destination chain.
	pub payload: Vec<u8>,
}

/// Validation context the parachain block was built with.
///
/// `relay_parent_number` is the relay chain block at which the parachain
/// block was backed; inclusion happens a small number of relay blocks later.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct PersistedValidationData {
	/// Head of the parent parachain block.
	pub parent_head: HeadData,
	/// Relay chain block number this block was built against.
	pub relay_parent_number: BlockNumber,
	/// Relay chain storage root at that block.
	pub relay_parent_storage_root: H256,
	/// Maximum legal proof-of-validity size, in bytes.
	pub max_pov_size: u32,
}

/// A committed message together with the merkle path proving its inclusion
/// under the block commitment.
#[derive(Encode, Decode, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct MessageProof {
	/// The proven message.
	pub message: OutboundQueueMessage,
	/// Merkle path from the message leaf to the commitment root.
	pub proof: MerkleProof,
}
