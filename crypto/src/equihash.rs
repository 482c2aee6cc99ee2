//! Equihash (n, k) support: personalised BLAKE2b state, a Wagner-style
//! solver, and solution verification through the `equihash` crate.
//!
//! The solver trades speed for clarity. Optimised solvers for the
//! production parameter set exist outside this codebase; everything here is
//! written against the same contract, so swapping one in stays local to the
//! mining loop's solver seam.

use blake2b_simd::{Params as Blake2bParams, State as Blake2bState};

/// Equihash parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
	pub n: u32,
	pub k: u32,
}

impl Params {
	pub fn new(n: u32, k: u32) -> Self {
		assert!(k > 0 && k < n);
		assert_eq!(n % (k + 1), 0);
		Params { n, k }
	}

	pub fn collision_bit_length(&self) -> usize {
		(self.n / (self.k + 1)) as usize
	}

	pub fn indices_per_hash_output(&self) -> usize {
		(512 / self.n) as usize
	}

	pub fn hash_output_length(&self) -> usize {
		self.indices_per_hash_output() * self.n as usize / 8
	}

	/// Number of initial rows in the collision search.
	pub fn rows(&self) -> usize {
		1 << (self.collision_bit_length() + 1)
	}

	/// Size of a minimally-encoded solution in bytes.
	pub fn solution_size(&self) -> usize {
		(1usize << self.k) * (self.collision_bit_length() + 1) / 8
	}

	fn personal(&self) -> [u8; 16] {
		let mut personal = [0u8; 16];
		personal[..8].copy_from_slice(b"ZcashPoW");
		personal[8..12].copy_from_slice(&self.n.to_le_bytes());
		personal[12..16].copy_from_slice(&self.k.to_le_bytes());
		personal
	}
}

/// Outcome of a solver run over one (input, nonce) pair.
#[derive(Debug, PartialEq)]
pub enum SolveResult {
	/// The solution callback accepted a solution.
	Found,
	/// All candidate solutions were offered and declined.
	Exhausted,
	/// The cancellation predicate fired mid-search.
	Cancelled,
}

/// BLAKE2b state initialised with the Equihash personalisation, ready to
/// absorb the header prefix and nonce.
pub fn initialise_state(params: &Params) -> Blake2bState {
	Blake2bParams::new()
		.hash_length(params.hash_output_length())
		.personal(&params.personal())
		.to_state()
}

struct Row {
	// n bits split into k + 1 chunks of collision_bit_length bits each.
	chunks: Vec<u32>,
	indices: Vec<u32>,
}

fn read_bits(data: &[u8], bit_offset: usize, bit_length: usize) -> u32 {
	let mut result = 0u32;
	for i in 0..bit_length {
		let bit = bit_offset + i;
		let byte = data[bit / 8];
		result = (result << 1) | u32::from((byte >> (7 - bit % 8)) & 1);
	}
	result
}

fn generate_rows(params: &Params, state: &Blake2bState) -> Vec<Row> {
	let cbl = params.collision_bit_length();
	let iph = params.indices_per_hash_output();
	let row_count = params.rows();
	let chunk_count = params.k as usize + 1;
	let hash_bytes = params.n as usize / 8;

	let mut rows = Vec::with_capacity(row_count);
	let mut block = 0u32;
	while rows.len() < row_count {
		let mut block_state = state.clone();
		block_state.update(&block.to_le_bytes());
		let hash = block_state.finalize();
		for part in 0..iph {
			if rows.len() == row_count {
				break;
			}
			let data = &hash.as_bytes()[part * hash_bytes..(part + 1) * hash_bytes];
			let chunks = (0..chunk_count).map(|c| read_bits(data, c * cbl, cbl)).collect();
			rows.push(Row {
				chunks,
				indices: vec![rows.len() as u32],
			});
		}
		block += 1;
	}
	rows
}

fn indices_disjoint(a: &[u32], b: &[u32]) -> bool {
	!a.iter().any(|i| b.contains(i))
}

// Solutions carry their index lists in the canonical order: of two merged
// lists, the one with the smaller leading index comes first.
fn merge_indices(a: &[u32], b: &[u32]) -> Vec<u32> {
	let mut merged = Vec::with_capacity(a.len() + b.len());
	if a[0] < b[0] {
		merged.extend_from_slice(a);
		merged.extend_from_slice(b);
	} else {
		merged.extend_from_slice(b);
		merged.extend_from_slice(a);
	}
	merged
}

/// Packs solution indices into the minimal byte representation: each index
/// occupies `collision_bit_length + 1` bits, big-endian, back to back.
pub fn minimal_from_indices(indices: &[u32], bit_length: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(indices.len() * bit_length / 8);
	let mut accumulator = 0u64;
	let mut bits = 0;
	for index in indices {
		accumulator = (accumulator << bit_length) | u64::from(*index);
		bits += bit_length;
		while bits >= 8 {
			bits -= 8;
			out.push((accumulator >> bits) as u8);
		}
	}
	out
}

/// Reference Wagner solver. Offers every discovered solution to
/// `each_solution` (minimal encoding) until one is accepted; polls
/// `cancelled` between collision rounds.
pub fn solve<F, C>(params: &Params, input: &[u8], nonce: &[u8], each_solution: &mut F, cancelled: &C) -> SolveResult
where
	F: FnMut(Vec<u8>) -> bool,
	C: Fn() -> bool,
{
	let mut state = initialise_state(params);
	state.update(input);
	state.update(nonce);

	let cbl = params.collision_bit_length();
	let k = params.k as usize;
	let mut rows = generate_rows(params, &state);

	// Rounds 1..k-1 collide on one chunk each; the final round collides on
	// the remaining two chunks at once.
	for round in 0..k - 1 {
		if cancelled() {
			return SolveResult::Cancelled;
		}

		rows.sort_unstable_by_key(|row| row.chunks[round]);
		let mut next = Vec::with_capacity(rows.len());
		let mut start = 0;
		while start < rows.len() {
			let mut end = start + 1;
			while end < rows.len() && rows[end].chunks[round] == rows[start].chunks[round] {
				end += 1;
			}
			for left in start..end {
				for right in left + 1..end {
					let (a, b) = (&rows[left], &rows[right]);
					if !indices_disjoint(&a.indices, &b.indices) {
						continue;
					}
					let chunks: Vec<u32> = (round + 1..=k).map(|c| a.chunks[c] ^ b.chunks[c]).collect();
					// A remainder of zero before the final round is a
					// trivial collision, not a solution prefix.
					if chunks.iter().all(|c| *c == 0) {
						continue;
					}
					let mut combined = vec![0; round + 1];
					combined.extend(chunks);
					next.push(Row {
						chunks: combined,
						indices: merge_indices(&a.indices, &b.indices),
					});
				}
			}
			start = end;
		}
		rows = next;
	}

	if cancelled() {
		return SolveResult::Cancelled;
	}

	rows.sort_unstable_by_key(|row| (row.chunks[k - 1], row.chunks[k]));
	let mut start = 0;
	while start < rows.len() {
		let mut end = start + 1;
		while end < rows.len() && rows[end].chunks[k - 1] == rows[start].chunks[k - 1] && rows[end].chunks[k] == rows[start].chunks[k] {
			end += 1;
		}
		for left in start..end {
			for right in left + 1..end {
				let (a, b) = (&rows[left], &rows[right]);
				if !indices_disjoint(&a.indices, &b.indices) {
					continue;
				}
				let indices = merge_indices(&a.indices, &b.indices);
				let minimal = minimal_from_indices(&indices, cbl + 1);
				if each_solution(minimal) {
					return SolveResult::Found;
				}
				if cancelled() {
					return SolveResult::Cancelled;
				}
			}
		}
		start = end;
	}

	SolveResult::Exhausted
}

/// Checks a minimal-encoded solution against the given input and nonce.
pub fn is_valid_solution(params: &Params, input: &[u8], nonce: &[u8], solution: &[u8]) -> bool {
	equihash::is_valid_solution(params.n, params.k, input, nonce, solution).is_ok()
}
