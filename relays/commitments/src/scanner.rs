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

//! Backward scan for commitments that still need to be relayed.

use crate::{
	client::{RelayClient, SourceClient, TargetClient},
	error::Error,
	task::Task,
};

use bp_commitments::{
	extract_commitment, verify_merkle_leaf, BlockNumber, ChannelId, MessageNonce, MessageProof,
	OutboundQueueMessage, ParaId,
};
use codec::Encode;
use futures::{
	future::{FutureExt, Shared},
	poll,
};
use sp_core::H256;
use sp_runtime::traits::{Hash, Keccak256};
use std::future::Future;

/// Scanner of undelivered commitments on one channel of one parachain.
///
/// Holds nothing but the injected connection handles and the scan identity;
/// every [`Self::scan`] call is a fresh recomputation from current chain
/// state, so independent channels may be scanned concurrently, each with its
/// own scanner.
pub struct CommitmentScanner<S, R, T> {
	pub(crate) source: S,
	pub(crate) relay: R,
	pub(crate) target: T,
	pub(crate) para_id: ParaId,
	pub(crate) channel: ChannelId,
}

/// Result of scanning the message list of a single committing block.
struct BlockScan {
	/// Proofs of the outstanding messages of this block, nonce ascending.
	proofs: Vec<MessageProof>,
	/// The already-delivered boundary was reached; no earlier block can hold
	/// outstanding messages.
	scan_done: bool,
}

impl<S: SourceClient, R: RelayClient, T: TargetClient> CommitmentScanner<S, R, T> {
	/// Create a scanner over the given connections.
	pub fn new(source: S, relay: R, target: T, para_id: ParaId, channel: ChannelId) -> Self {
		CommitmentScanner { source, relay, target, para_id, channel }
	}

	/// Scan for all commitments on the configured channel that need to be
	/// relayed and can be proven at the given relay chain checkpoint block.
	///
	/// The algorithm works roughly like this:
	/// 1. fetch the channel nonce on both sides of the bridge and compare
	///    them; if the parachain side is not ahead, exit early;
	/// 2. scan parachain blocks backwards to find exactly which commitments
	///    need to be relayed, proving every outstanding message;
	/// 3. for all blocks with unsettled commitments, determine the relay
	///    chain block in which the parachain block was included.
	///
	/// The scan is cancellable between chain queries through `exit_signal`;
	/// a cancelled or failed scan yields no tasks at all.
	pub async fn scan(
		&self,
		checkpoint_relay_block: BlockNumber,
		exit_signal: impl Future<Output = ()> + Send,
	) -> Result<Vec<Task>, Error> {
		let mut exit_signal = exit_signal.shared();

		// the last parachain head finalized *before* the checkpoint block is
		// the newest block provable under the checkpoint consensus proof
		let relay_block_hash =
			self.relay.block_hash(checkpoint_relay_block.saturating_sub(1)).await?;
		let para_head = self
			.relay
			.parachain_head(self.para_id, relay_block_hash)
			.await?
			.ok_or(Error::ParachainNotRegistered(self.para_id))?;
		let para_block = para_head.number;
		let para_block_hash = self.source.block_hash(para_block).await?;

		let (delivered_nonce, _) = self.target.channel_nonce(self.channel).await?;
		log::info!(
			target: "bridge",
			"Latest nonce delivered to the gateway on channel {:?}: {}",
			self.channel,
			delivered_nonce,
		);

		let committed_nonce = self.source.outbound_nonce(self.channel, para_block_hash).await?;
		log::info!(
			target: "bridge",
			"Latest nonce committed by the outbound queue on channel {:?}: {}",
			self.channel,
			committed_nonce,
		);

		if committed_nonce <= delivered_nonce {
			return Ok(Vec::new())
		}

		log::info!(
			target: "bridge",
			"Nonces are mismatched, scanning for commitments that need to be relayed",
		);

		let mut tasks =
			self.find_tasks(para_block, delivered_nonce + 1, &mut exit_signal).await?;
		self.gather_proof_inputs(&mut tasks, &mut exit_signal).await?;

		Ok(tasks)
	}

	/// Search backwards from the given block for all blocks holding
	/// outstanding commitments, until the starting nonce is collected or
	/// proven already delivered.
	async fn find_tasks<F>(
		&self,
		last_block: BlockNumber,
		starting_nonce: MessageNonce,
		exit_signal: &mut Shared<F>,
	) -> Result<Vec<Task>, Error>
	where
		F: Future<Output = ()>,
	{
		log::debug!(
			target: "bridge",
			"Searching backwards from block {} to find nonce {} on channel {:?}",
			last_block,
			starting_nonce,
			self.channel,
		);

		let mut tasks = Vec::new();
		let mut current_block = last_block;
		while current_block > 0 {
			if poll!(&mut *exit_signal).is_ready() {
				return Err(Error::Cancelled)
			}

			log::debug!(target: "bridge", "Checking header of block {}", current_block);

			let block_hash = self.source.block_hash(current_block).await?;
			let header = self.source.header(block_hash).await?;

			let commitment = match extract_commitment(&header.digest)
				.map_err(|e| Error::Digest(e, block_hash))?
			{
				Some(commitment) => commitment,
				None => {
					current_block -= 1;
					continue
				},
			};

			let messages = self
				.source
				.committed_messages(block_hash)
				.await?
				.ok_or(Error::MissingMessages(block_hash))?;

			let block_scan =
				self.scan_commitments(block_hash, commitment, messages, starting_nonce).await?;
			if !block_scan.proofs.is_empty() {
				tasks.push(Task {
					header,
					message_proofs: block_scan.proofs,
					proof_input: None,
				});
			}
			if block_scan.scan_done {
				break
			}

			current_block -= 1;
		}

		// collected newest to oldest; delivery must see ascending block order
		tasks.reverse();

		Ok(tasks)
	}

	/// Scan the full message list of one committing block, proving every
	/// outstanding message of the configured channel.
	///
	/// There are 4 cases here:
	/// 1. the block holds no messages of this channel: keep walking;
	/// 2. all channel messages of this block are already delivered: the walk
	///    is complete, nothing earlier can be outstanding;
	/// 3. messages need to be relayed and none have been delivered: keep
	///    walking;
	/// 4. messages need to be relayed and some have been delivered: the walk
	///    completes inside this block.
	///
	/// Messages are stored nonce ascending; traversing them in reverse
	/// distinguishes cases 2 and 4 without knowing the message count in
	/// advance: the first channel message seen is the highest-nonced one, so
	/// seeing it below the starting nonce proves the whole block (and every
	/// earlier block) delivered, while reaching the starting nonce exactly
	/// completes the collection.
	async fn scan_commitments(
		&self,
		block_hash: H256,
		commitment: H256,
		messages: Vec<OutboundQueueMessage>,
		starting_nonce: MessageNonce,
	) -> Result<BlockScan, Error> {
		let mut proofs = Vec::new();
		let mut scan_done = false;

		for (leaf_index, message) in messages.iter().enumerate().rev() {
			if message.origin != self.channel {
				continue
			}

			if message.nonce < starting_nonce {
				log::debug!(
					target: "bridge",
					"Halting scan for channel {:?}: messages below nonce {} are already delivered",
					self.channel,
					starting_nonce,
				);
				scan_done = true;
				break
			}

			// proofs are positional: the index is the message's position in
			// the full committed list, not in the channel-filtered subset
			let proof = self.fetch_message_proof(block_hash, leaf_index as u64, message).await?;
			if proof.proof.root != commitment {
				return Err(Error::CommitmentMismatch {
					channel: self.channel,
					block: block_hash,
					nonce: message.nonce,
					proof_root: proof.proof.root,
					commitment,
				})
			}
			proofs.push(proof);

			if message.nonce == starting_nonce {
				scan_done = true;
			}
		}

		// collected highest to lowest; delivery must see ascending nonces
		proofs.reverse();

		Ok(BlockScan { proofs, scan_done })
	}

	/// Fetch the inclusion proof of a single message and check that it
	/// actually commits to that message.
	async fn fetch_message_proof(
		&self,
		block_hash: H256,
		leaf_index: u64,
		message: &OutboundQueueMessage,
	) -> Result<MessageProof, Error> {
		let proof = self.source.prove_message(leaf_index, block_hash).await?.ok_or(
			Error::ProofUnavailable { block: block_hash, leaf_index, nonce: message.nonce },
		)?;

		let leaf = Keccak256::hash(&message.encode());
		if proof.leaf != leaf || !verify_merkle_leaf::<Keccak256>(proof.root, &proof) {
			return Err(Error::InvalidProof {
				block: block_hash,
				leaf_index,
				nonce: message.nonce,
			})
		}

		Ok(MessageProof { message: message.clone(), proof })
	}
}
