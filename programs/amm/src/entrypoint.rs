//! Program entrypoint

use crate::processor::process_instruction;
use pinocchio::entrypoint;

entrypoint!(process_instruction);
