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

//! Units of relay work produced by the scan.

use bp_commitments::{BlockNumber, HeadData, Header, MessageProof, ParaId};

/// Input of the finality proof of a single task.
///
/// The destination chain light client verifies relay chain finality, not
/// parachain finality, so the proof must present the relay chain's complete
/// view of parachain heads at the inclusion block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofInput {
	/// Parachain that produced the committing block.
	pub para_id: ParaId,
	/// Relay chain block at which the committing block was included.
	pub relay_block_number: BlockNumber,
	/// Heads of all registered parachains at that relay chain block.
	pub para_heads: Vec<(ParaId, HeadData)>,
}

/// Everything needed to deliver the outstanding messages of one source
/// chain block.
///
/// Created by the backward walk with proofs already attached, completed by
/// the inclusion search. A task never leaves the scanner with an empty proof
/// list or an unset proof input; once complete it is immutable and owned by
/// the downstream submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
	/// Header of the committing block.
	pub header: Header,
	/// Proofs of the outstanding messages, nonce ascending.
	pub message_proofs: Vec<MessageProof>,
	/// Finality proof input. `None` only while the task is being built.
	pub proof_input: Option<ProofInput>,
}
