//! Errors that stop a simulation from starting or continuing.

#![allow(non_snake_case)]

use thiserror::Error;

/// Everything that can go wrong while setting up or running a
/// simulation.
///
/// None of these are transient: they all come from bad parameters or
/// from the outside world (files, terminal), so nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The lattice side length cannot be used.
    #[error("invalid lattice size {L}: the side length must be at least 1")]
    InvalidSize {
        /// The rejected side length.
        L: usize,
    },
    /// The temperature is zero, negative, or not a number.
    #[error("invalid temperature {T}: the temperature must be positive and finite")]
    InvalidTemperature {
        /// The rejected temperature.
        T: f64,
    },
    /// The coupling constant is not a finite number.
    #[error("invalid coupling constant {J}")]
    InvalidCoupling {
        /// The rejected coupling.
        J: f64,
    },
    /// A spin that is neither +1 nor -1.
    #[error("invalid spin {value} at site {index}: spins must be +1 or -1")]
    InvalidSpin {
        /// Flat index of the offending site.
        index: usize,
        /// The value found there.
        value: i8,
    },
    /// Reading or writing failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The trace file name has no extension we know how to write.
    #[error("cannot write a trace to {0:?}: use a .yaml, .json or .cbor file")]
    UnknownFormat(std::path::PathBuf),
    /// Writing the trace as yaml failed.
    #[error("error writing yaml trace: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Writing the trace as json failed.
    #[error("error writing json trace: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing the trace as cbor failed.
    #[error("error writing cbor trace: {0}")]
    Cbor(#[from] serde_cbor::Error),
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that `T` is a temperature we can simulate at.
pub fn check_temperature(T: f64) -> Result<f64> {
    if T.is_finite() && T > 0.0 {
        Ok(T)
    } else {
        Err(Error::InvalidTemperature { T })
    }
}

#[test]
fn temperatures_are_checked() {
    assert_eq!(check_temperature(2.5).unwrap(), 2.5);
    for &bad in &[0.0, -0.0, -1.0, std::f64::NAN, std::f64::INFINITY] {
        match check_temperature(bad) {
            Err(Error::InvalidTemperature { .. }) => (),
            other => panic!("{} should be rejected, got {:?}", bad, other),
        }
    }
}

#[test]
fn serializer_errors_keep_their_source() {
    use std::error::Error as _;
    let e: Error = serde_json::from_str::<u8>("not a number").unwrap_err().into();
    assert!(e.to_string().starts_with("error writing json trace: "));
    assert!(e.source().is_some());
}
