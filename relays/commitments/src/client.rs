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

//! Typed read-only interfaces to the chain connections used by the scan.
//!
//! Connection handles are long-lived, owned by the host application and
//! injected into the scanner. Retries, timeouts and reconnection live behind
//! these traits; implementations map transport failures to
//! [`Error::Client`]. Decoding failures of dynamic RPC responses surface as
//! distinct error variants, never as silent `None`s.

use crate::error::Error;

use async_trait::async_trait;
use bp_commitments::{
	BlockNumber, ChannelId, HeadData, Header, MerkleProof, MessageNonce, OutboundQueueMessage,
	ParaId, PersistedValidationData,
};
use sp_core::H256;

/// Read-only client of the source parachain.
#[async_trait]
pub trait SourceClient: Send + Sync {
	/// Hash of the parachain block with the given number.
	async fn block_hash(&self, number: BlockNumber) -> Result<H256, Error>;

	/// Header of the given parachain block.
	async fn header(&self, at: H256) -> Result<Header, Error>;

	/// Full, channel-unfiltered list of messages committed at the given
	/// block, in commitment (leaf) order. `None` when the storage holds no
	/// message list at that block.
	async fn committed_messages(
		&self,
		at: H256,
	) -> Result<Option<Vec<OutboundQueueMessage>>, Error>;

	/// Latest nonce committed on the given channel, as of the given block.
	/// Zero for a channel that has emitted nothing yet.
	async fn outbound_nonce(&self, channel: ChannelId, at: H256) -> Result<MessageNonce, Error>;

	/// Validation context the given block was built with.
	async fn validation_data(&self, at: H256)
		-> Result<Option<PersistedValidationData>, Error>;

	/// Inclusion proof of the message at `leaf_index` of the full committed
	/// message list, under the commitment of the given block. `None` when
	/// the chain reports no proof for that index.
	async fn prove_message(&self, leaf_index: u64, at: H256)
		-> Result<Option<MerkleProof>, Error>;
}

/// Read-only client of the relay chain.
#[async_trait]
pub trait RelayClient: Send + Sync {
	/// Hash of the relay chain block with the given number.
	async fn block_hash(&self, number: BlockNumber) -> Result<H256, Error>;

	/// Head of the given parachain, as seen by the relay chain at the given
	/// block. `None` when the parachain is not registered there.
	async fn parachain_head(&self, para_id: ParaId, at: H256) -> Result<Option<Header>, Error>;

	/// Heads of all registered parachains at the given relay chain block.
	async fn parachain_heads(&self, at: H256) -> Result<Vec<(ParaId, HeadData)>, Error>;
}

/// Read-only client of the destination chain gateway.
#[async_trait]
pub trait TargetClient: Send + Sync {
	/// `(inbound, outbound)` nonce pair of the given channel at the gateway.
	/// The inbound nonce is the last nonce delivered to the gateway.
	async fn channel_nonce(
		&self,
		channel: ChannelId,
	) -> Result<(MessageNonce, MessageNonce), Error>;
}
