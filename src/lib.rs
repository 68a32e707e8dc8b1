//! ZC706 LDO rail bank driver.
//!
//! Eight LDO regulators are each controlled through one GPIO expander: bit 6 drives the regulator
//! enable, bit 7 reads power-good, and bits 5-0 select the output voltage through the pin direction
//! register (active-low). A separate GPIO expander acts as an address multiplexer that routes the
//! rail bus to one bank of rail expanders at a time.
//!
//! [`RailManager`] owns both buses and selects the right bank before every rail access. [`Ldo`] and
//! [`AddressMux`] can be used directly when finer control is needed.

#![no_std]

pub mod board;
pub mod data_types;
pub mod error;
pub mod expander;
pub mod ldo;
pub mod manager;
pub mod mux;
pub mod registers;

pub use data_types::{Rail, RailMap, VoltageRange};
pub use error::Error;
pub use ldo::Ldo;
pub use manager::RailManager;
pub use mux::AddressMux;
