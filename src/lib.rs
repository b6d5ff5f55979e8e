//! This crate simulates the two-dimensional Ising model with the
//! Metropolis algorithm.
//!
//! The physics lives in [`system`], the Monte Carlo algorithm in
//! [`mc`], and the terminal display in [`render`].

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(missing_docs)]

#[macro_use]
extern crate serde_derive;

pub mod atomicfile;
pub mod error;
pub mod mc;
pub mod prettyfloat;
pub mod render;
pub mod rng;
pub mod system;

pub use crate::error::{Error, Result};
