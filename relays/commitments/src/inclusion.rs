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

//! Forward search for the relay chain block including a parachain block.

use crate::{
	client::{RelayClient, SourceClient, TargetClient},
	error::Error,
	scanner::CommitmentScanner,
	task::{ProofInput, Task},
};

use bp_commitments::BlockNumber;
use futures::{future::Shared, poll};
use std::future::Future;

/// The process of finalizing a backed parachain header times out after this
/// many relay chain blocks.
pub const FINALIZATION_TIMEOUT: BlockNumber = 4;

impl<S: SourceClient, R: RelayClient, T: TargetClient> CommitmentScanner<S, R, T> {
	/// For each task, find the relay chain block in which the committing
	/// parachain block was included and capture the parachain head table at
	/// that block.
	pub(crate) async fn gather_proof_inputs<F>(
		&self,
		tasks: &mut [Task],
		exit_signal: &mut Shared<F>,
	) -> Result<(), Error>
	where
		F: Future<Output = ()>,
	{
		for task in tasks.iter_mut() {
			if poll!(&mut *exit_signal).is_ready() {
				return Err(Error::Cancelled)
			}

			log::debug!(
				target: "bridge",
				"Gathering proof inputs for parachain block {}",
				task.header.number,
			);

			let relay_block_number = self.find_inclusion_block(task.header.number).await?;
			let relay_block_hash = self.relay.block_hash(relay_block_number).await?;
			let para_heads = self.relay.parachain_heads(relay_block_hash).await?;

			task.proof_input =
				Some(ProofInput { para_id: self.para_id, relay_block_number, para_heads });
		}

		Ok(())
	}

	/// Find the relay chain block in which the given parachain block was
	/// included. This usually happens 2-3 blocks after the relay chain block
	/// in which it was backed.
	pub(crate) async fn find_inclusion_block(
		&self,
		para_block: BlockNumber,
	) -> Result<BlockNumber, Error> {
		let para_block_hash = self.source.block_hash(para_block).await?;
		let validation_data = self
			.source
			.validation_data(para_block_hash)
			.await?
			.ok_or(Error::MissingValidationData(para_block_hash))?;

		let relay_parent = validation_data.relay_parent_number;
		for relay_block in relay_parent + 1..=relay_parent + FINALIZATION_TIMEOUT {
			let relay_block_hash = self.relay.block_hash(relay_block).await?;
			let para_head = self
				.relay
				.parachain_head(self.para_id, relay_block_hash)
				.await?
				.ok_or(Error::ParachainNotRegistered(self.para_id))?;

			if para_head.number == para_block {
				return Ok(relay_block)
			}
		}

		Err(Error::InclusionTimeout {
			para_block,
			relay_parent,
			timeout: FINALIZATION_TIMEOUT,
		})
	}
}
