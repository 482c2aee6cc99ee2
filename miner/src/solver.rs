//! The Equihash solver contract the mining loop drives: one call per
//! nonce, solutions delivered through a callback, cooperative cancellation.

use onyxcrypto::equihash::{self, Params, SolveResult};
use primitives::bytes::Bytes;
use primitives::hash::H256;
use std::str::FromStr;

/// Which solver implementation to drive.
///
/// `Tromp` is accepted for configuration compatibility with nodes whose
/// optimised solver was a separate C implementation. No Rust port of it
/// exists here, so both selectors currently drive the portable solver; the
/// distinction is kept so a port can slot in without a config change.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SolverKind {
	/// The portable reference solver.
	Default,
	/// Alias of the portable solver, see above.
	Tromp,
}

impl Default for SolverKind {
	fn default() -> Self {
		SolverKind::Default
	}
}

impl FromStr for SolverKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"default" => Ok(SolverKind::Default),
			"tromp" => Ok(SolverKind::Tromp),
			other => Err(format!("unknown equihash solver: {}", other)),
		}
	}
}

/// One Equihash run over a fixed (header prefix, nonce) pair. The solver
/// feeds every solution it finds to `valid_block` until one is accepted,
/// and polls `cancelled` at its own discretion. Target comparison is the
/// caller's business.
pub trait EquihashSolver: Send + Sync {
	fn name(&self) -> &'static str;

	fn solve(&self, input: &[u8], nonce: &H256, valid_block: &mut dyn FnMut(Bytes) -> bool, cancelled: &dyn Fn() -> bool) -> SolveResult;
}

pub struct DefaultSolver {
	name: &'static str,
	params: Params,
}

impl EquihashSolver for DefaultSolver {
	fn name(&self) -> &'static str {
		self.name
	}

	fn solve(&self, input: &[u8], nonce: &H256, valid_block: &mut dyn FnMut(Bytes) -> bool, cancelled: &dyn Fn() -> bool) -> SolveResult {
		equihash::solve(&self.params, input, &nonce[..], &mut |solution| valid_block(solution.into()), &cancelled)
	}
}

/// Resolves the configured solver. Both selectors run the portable
/// implementation; the chosen name is kept for logging so the operator sees
/// what was asked for.
pub fn create_solver(kind: SolverKind, params: Params) -> Box<dyn EquihashSolver> {
	let name = match kind {
		SolverKind::Default => "default",
		SolverKind::Tromp => "tromp",
	};
	Box::new(DefaultSolver { name, params })
}
