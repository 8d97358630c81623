// Copyright 2019-2021 Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.

//! Errors of a single scan invocation.

use bp_commitments::{BlockNumber, ChannelId, DigestError, MessageNonce, ParaId};
use sp_core::H256;

/// Error that aborts the whole scan.
///
/// Every variant carries the context identifying the failing query (channel,
/// block, nonce); the caller owns the retry policy and the visibility. A
/// failed scan yields no tasks at all, never a partial list.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Transport-level failure of one of the chain clients.
	///
	/// Produced by the connection layer, propagated unmodified.
	#[error("chain client error: {0}")]
	Client(String),
	/// The parachain is not registered at the relay chain.
	#[error("parachain {0:?} is not registered at the relay chain")]
	ParachainNotRegistered(ParaId),
	/// Header digest of the given block could not be decoded.
	#[error("malformed digest of block {1}: {0:?}")]
	Digest(DigestError, H256),
	/// The block carries a commitment but its committed message list is
	/// missing, so the state was pruned or never produced.
	#[error("committed messages not found for block {0}")]
	MissingMessages(H256),
	/// Recomputed proof root disagrees with the commitment embedded in the
	/// header digest. The source chain view is inconsistent or adversarial;
	/// nothing from this scan may be forwarded.
	#[error(
		"proof root {proof_root} for message nonce {nonce} on channel {channel:?} \
		 in block {block} does not match the header commitment {commitment}"
	)]
	CommitmentMismatch {
		/// Channel the message belongs to.
		channel: ChannelId,
		/// Hash of the committing block.
		block: H256,
		/// Nonce of the message whose proof failed the check.
		nonce: MessageNonce,
		/// Root claimed by the fetched proof.
		proof_root: H256,
		/// Commitment recorded in the header digest.
		commitment: H256,
	},
	/// The fetched proof does not prove the scanned message.
	#[error("proof for leaf {leaf_index} of block {block} does not commit to message nonce {nonce}")]
	InvalidProof {
		/// Hash of the committing block.
		block: H256,
		/// Position of the message in the full committed message list.
		leaf_index: u64,
		/// Nonce of the message the proof was requested for.
		nonce: MessageNonce,
	},
	/// The source chain reports no proof for the given leaf.
	#[error("no proof for leaf {leaf_index} (message nonce {nonce}) at block {block}")]
	ProofUnavailable {
		/// Hash of the committing block.
		block: H256,
		/// Position of the message in the full committed message list.
		leaf_index: u64,
		/// Nonce of the message the proof was requested for.
		nonce: MessageNonce,
	},
	/// Persisted validation data is absent at the given block, so its relay
	/// parent cannot be determined.
	#[error("persisted validation data not found for block {0}")]
	MissingValidationData(H256),
	/// The parachain block was not seen as included on the relay chain
	/// within the finality window.
	#[error(
		"parachain block {para_block} not included on the relay chain within \
		 {timeout} blocks after relay parent {relay_parent}"
	)]
	InclusionTimeout {
		/// Number of the parachain block that was never seen as included.
		para_block: BlockNumber,
		/// Relay chain block the parachain block was backed at.
		relay_parent: BlockNumber,
		/// Width of the probe window, in relay blocks.
		timeout: BlockNumber,
	},
	/// The scan was cancelled between two chain queries.
	#[error("scan cancelled")]
	Cancelled,
}
