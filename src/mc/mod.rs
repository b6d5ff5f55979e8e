//! Monte Carlo algorithms, and the plugins that watch them run.

pub mod metropolis;
pub mod plugin;

use crate::system::*;

/// A Monte Carlo algorithm.
pub trait MonteCarlo {
    /// The system being simulated.
    type System: System;

    /// Make one sweep of random moves.
    fn sweep(&mut self);

    /// The system in its current state.
    fn system(&self) -> &Self::System;

    /// The temperature the next sweep will run at.
    fn temperature(&self) -> f64;

    /// The number of sweeps that have been made.
    fn num_sweeps(&self) -> u64;

    /// The number of moves that have been attempted.
    fn num_moves(&self) -> u64;

    /// The number of moves that were accepted.
    fn num_accepted_moves(&self) -> u64;
}
