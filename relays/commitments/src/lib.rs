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

//! Scanner for undelivered outbound-queue commitments.
//!
//! Messages emitted on the source parachain must reach the gateway on the
//! destination chain exactly once, in nonce order. This crate reconstructs,
//! from current chain state alone, everything a submitter needs to deliver
//! the outstanding messages of one channel:
//!
//! 1. compare the channel nonce on both sides of the bridge; exit early when
//!    they match;
//! 2. walk source chain blocks backwards to find every commitment that still
//!    needs to be relayed, fetching and checking a merkle proof per message;
//! 3. for every block holding such a commitment, find the relay chain block
//!    at which it was included and capture the parachain head table there.
//!
//! The scan owns no state across invocations: every run is a fresh
//! recomputation, so a failed scan is retried from scratch by the caller.

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod inclusion;
pub mod scanner;
pub mod task;

pub use client::{RelayClient, SourceClient, TargetClient};
pub use error::Error;
pub use inclusion::FINALIZATION_TIMEOUT;
pub use scanner::CommitmentScanner;
pub use task::{ProofInput, Task};
