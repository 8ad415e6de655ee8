//! # unasm-core
//!
//! Core abstractions for the unasm disassembler. This crate defines the
//! decoded-instruction record, the mnemonic vocabulary, and the x86-64
//! general-purpose register name tables shared by the decoder and the
//! command-line driver.

pub mod instruction;
pub mod mnemonic;
pub mod register;

pub use instruction::DecodedInstruction;
pub use mnemonic::Mnemonic;
pub use register::{register_name, Width};
