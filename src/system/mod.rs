//! Systems are things that have energy and can be changed into
//! different configurations.

pub mod ising;
pub mod lattice;

use crate::rng::MyRng;

/// An energy, in the same units as the coupling `J` and the
/// temperature.
pub type Energy = f64;

/// A physical system, which has some energy.
pub trait System {
    /// Returns the energy of the system, computed from scratch.
    fn energy(&self) -> Energy;
    /// The number of degrees of freedom, which is how many moves make
    /// up one sweep.
    fn num_sites(&self) -> usize;
}

/// A system that can be changed one small step at a time.
pub trait MovableSystem: System {
    /// Choose a random move and return the change in energy it would
    /// cause.  Nothing changes until `confirm` is called.
    fn plan_move(&mut self, rng: &mut MyRng) -> Energy;
    /// Carry out the move we most recently planned.
    fn confirm(&mut self);
}
