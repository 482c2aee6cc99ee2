//! Script primitives the miner needs: building coinbase script_sigs and
//! standard output scripts, and counting signature operations.

extern crate onyxcrypto;
extern crate primitives;

mod builder;
mod num;
mod opcode;
mod script;

pub use primitives::bytes;

pub use crate::builder::Builder;
pub use crate::num::ScriptNum;
pub use crate::opcode::Opcode;
pub use crate::script::{Instruction, Script};
