//! The Ising model

#![allow(non_snake_case)]

use super::lattice::SquareLattice;
use super::*;
use crate::error::{self, Error};

use auto_args::AutoArgs;
use rand::distributions::Uniform;
use rand::Rng;

/// The parameters needed to configure an Ising model.
///
/// These parameters are normally set via command-line arguments.
#[derive(Serialize, Deserialize, Debug, AutoArgs, Clone)]
pub struct IsingParams {
    /// Width of the square grid
    pub L: usize,
    /// The coupling constant (default 1)
    pub J: Option<f64>,
}

impl Default for IsingParams {
    fn default() -> Self {
        IsingParams { L: 27, J: None }
    }
}

/// An Ising model with nearest-neighbor coupling and no field.
///
/// The energy is `E = -J Σ s_i s_j` over nearest-neighbor bonds, each
/// bond counted once.
#[derive(Debug, Clone)]
pub struct Ising {
    /// The coupling constant
    J: Energy,
    /// The spins themselves
    lattice: SquareLattice,
    /// How we choose a coordinate at random.
    pick: Uniform<u32>,
    /// The site we last planned to flip.
    possible_change: Option<(isize, isize)>,
}

impl Ising {
    /// Build a model from params, with a random starting configuration.
    pub fn from_params(params: IsingParams, rng: &mut MyRng) -> error::Result<Ising> {
        let lattice = SquareLattice::random(params.L, rng)?;
        Ising::new(lattice, params.J.unwrap_or(1.0))
    }

    /// Build a model on a given lattice.
    pub fn new(lattice: SquareLattice, J: Energy) -> error::Result<Ising> {
        if !J.is_finite() {
            return Err(Error::InvalidCoupling { J });
        }
        let pick = Uniform::new(0, lattice.side_length() as u32);
        Ok(Ising {
            J,
            lattice,
            pick,
            possible_change: None,
        })
    }

    /// The coupling constant.
    pub fn coupling(&self) -> Energy {
        self.J
    }

    /// The spins.
    pub fn lattice(&self) -> &SquareLattice {
        &self.lattice
    }

    /// Mutable access to the spins.
    pub fn lattice_mut(&mut self) -> &mut SquareLattice {
        self.possible_change = None;
        &mut self.lattice
    }

    /// The sum of the four nearest neighbors of `(x, y)`.  This is
    /// always one of -4, -2, 0, 2 or 4.
    pub fn neighbor_sum(&self, x: isize, y: isize) -> i8 {
        let s = &self.lattice;
        s.get(x + 1, y).value()
            + s.get(x - 1, y).value()
            + s.get(x, y + 1).value()
            + s.get(x, y - 1).value()
    }

    /// The energy change that flipping `(x, y)` would cause.
    pub fn flip_energy(&self, x: isize, y: isize) -> Energy {
        let si = self.lattice.get(x, y).value();
        2.0 * self.J * (si * self.neighbor_sum(x, y)) as f64
    }

    /// The total magnetization.
    pub fn magnetization(&self) -> i64 {
        self.lattice.magnetization()
    }
}

impl System for Ising {
    fn energy(&self) -> Energy {
        let s = &self.lattice;
        let L = s.side_length() as isize;
        let mut bonds: i64 = 0;
        for y in 0..L {
            for x in 0..L {
                // Only the right and down bonds, so each is counted once.
                let si = s.get(x, y).value();
                let neighbor_tot = s.get(x + 1, y).value() + s.get(x, y + 1).value();
                bonds += (si * neighbor_tot) as i64;
            }
        }
        -self.J * bonds as f64
    }
    fn num_sites(&self) -> usize {
        self.lattice.num_sites()
    }
}

impl MovableSystem for Ising {
    fn plan_move(&mut self, rng: &mut MyRng) -> Energy {
        let x = rng.sample(self.pick) as isize;
        let y = rng.sample(self.pick) as isize;
        self.possible_change = Some((x, y));
        self.flip_energy(x, y)
    }
    fn confirm(&mut self) {
        if let Some((x, y)) = self.possible_change.take() {
            self.lattice.flip(x, y);
        }
    }
}

#[cfg(test)]
use super::lattice::Spin;

#[cfg(test)]
fn aligned(L: usize, J: Energy) -> Ising {
    Ising::new(SquareLattice::aligned(L, Spin::Up).unwrap(), J).unwrap()
}

#[test]
fn aligned_energy_counts_each_bond_once() {
    for &L in &[1, 2, 3, 5, 10, 27] {
        for &J in &[1.0, 0.5, -1.0] {
            let ising = aligned(L, J);
            assert_eq!(ising.energy(), -2.0 * J * (L * L) as f64);
        }
    }
}

#[test]
fn checkerboard_energy() {
    // On an even lattice the checkerboard breaks every bond.
    let L = 6;
    let values: Vec<i8> = (0..L * L)
        .map(|i| if (i % L + i / L) % 2 == 0 { 1 } else { -1 })
        .collect();
    let ising = Ising::new(SquareLattice::from_spins(L, &values).unwrap(), 1.0).unwrap();
    assert_eq!(ising.energy(), 2.0 * (L * L) as f64);
    assert_eq!(ising.neighbor_sum(0, 0), -4);
    assert_eq!(ising.flip_energy(0, 0), -8.0);
    // ... which is the ground state of the antiferromagnet.
    let afm = Ising::new(ising.lattice().clone(), -1.0).unwrap();
    assert_eq!(afm.energy(), -2.0 * (L * L) as f64);
}

#[test]
fn neighbor_sum_wraps() {
    let mut ising = aligned(4, 1.0);
    ising.lattice_mut().set(3, 0, Spin::Down);
    ising.lattice_mut().set(0, 3, Spin::Down);
    // (0, 0) sees (3, 0) to its left and (0, 3) above it.
    assert_eq!(ising.neighbor_sum(0, 0), 0);
    assert_eq!(ising.neighbor_sum(4, -4), 0);
    assert_eq!(ising.neighbor_sum(1, 1), 4);
    assert_eq!(ising.flip_energy(1, 1), 8.0);
}

#[test]
fn flip_energy_matches_recomputed_energy() {
    let mut rng = crate::rng::from_seed(10137);
    // With L = 1 a site is its own neighbor, and flipping it never
    // changes the energy.
    for &L in &[2, 3, 10, 15] {
        let mut ising = Ising::from_params(IsingParams { L, J: Some(1.0) }, &mut rng).unwrap();
        for _ in 0..2000 {
            let e1 = ising.energy();
            let de = ising.plan_move(&mut rng);
            ising.confirm();
            assert_eq!(ising.energy(), e1 + de);
        }
    }
}

#[test]
fn confirm_without_plan_does_nothing() {
    let mut ising = aligned(3, 1.0);
    ising.confirm();
    assert_eq!(ising.magnetization(), 9);
    let mut rng = crate::rng::from_seed(1);
    ising.plan_move(&mut rng);
    ising.confirm();
    ising.confirm();
    assert_eq!(ising.magnetization(), 7);
}

#[test]
fn infinite_coupling_is_rejected() {
    let lattice = SquareLattice::aligned(2, Spin::Up).unwrap();
    assert!(Ising::new(lattice, std::f64::INFINITY).is_err());
}
