// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2023 Snowfork <hello@snowfork.com>
//! Header digest codec for message commitments.
//!
//! The outbound queue commits the messages of a block by depositing a
//! [`CustomDigestItem::Commitment`] log, SCALE-encoded inside
//! `DigestItem::Other`. A block that emits no messages deposits nothing.

use codec::{Decode, Encode};
use sp_core::H256;
use sp_runtime::{Digest, DigestItem, RuntimeDebug};

/// Custom digest item deposited by the outbound queue.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug)]
pub enum CustomDigestItem {
	/// Merkle root over all messages committed in this block.
	#[codec(index = 0)]
	Commitment(H256),
}

impl From<CustomDigestItem> for DigestItem {
	fn from(item: CustomDigestItem) -> DigestItem {
		DigestItem::Other(item.encode())
	}
}

/// Error decoding a commitment from the header digest.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum DigestError {
	/// A `DigestItem::Other` log is present but is not a valid
	/// [`CustomDigestItem`].
	MalformedDigestItem,
}

/// Extract the message commitment from a header digest.
///
/// `Ok(None)` means the block emitted no messages. Consensus logs deposited
/// by other subsystems are skipped; a malformed `Other` log is an error, not
/// an absent commitment.
pub fn extract_commitment(digest: &Digest) -> Result<Option<H256>, DigestError> {
	for log in digest.logs() {
		if let DigestItem::Other(data) = log {
			let item = CustomDigestItem::decode(&mut &data[..])
				.map_err(|_| DigestError::MalformedDigestItem)?;
			let CustomDigestItem::Commitment(commitment) = item;
			return Ok(Some(commitment))
		}
	}
	Ok(None)
}
