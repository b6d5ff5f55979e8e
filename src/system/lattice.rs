//! A square lattice of spins with periodic boundary conditions.

#![allow(non_snake_case)]

use crate::error::{Error, Result};
use crate::rng::MyRng;

use rand::Rng;

/// A single spin, which is either up (+1) or down (-1).
///
/// Storing spins as this type rather than as a bare integer means
/// that no other value can ever end up on the lattice.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Spin {
    /// +1
    Up = 1,
    /// -1
    Down = -1,
}

impl Spin {
    /// The numerical value, +1 or -1.
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }
    /// The opposite spin.
    #[inline]
    pub fn flipped(self) -> Spin {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }
    /// Convert +1 or -1 into a spin.
    pub fn from_value(value: i8) -> Option<Spin> {
        match value {
            1 => Some(Spin::Up),
            -1 => Some(Spin::Down),
            _ => None,
        }
    }
}

/// An `L` by `L` grid of spins on a torus.
///
/// Site `(x, y)` is stored at `x + y*L`, so rows of constant `y` are
/// contiguous.  Every coordinate is wrapped into `[0, L)` before it
/// touches the array, which makes any integer coordinate valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SquareLattice {
    L: usize,
    S: Vec<Spin>,
}

impl SquareLattice {
    /// A lattice where every site is independently up or down with
    /// probability one half.  Sites are filled in storage order, one
    /// uniform draw per site.
    pub fn random(L: usize, rng: &mut MyRng) -> Result<SquareLattice> {
        let n = check_size(L)?;
        let S = (0..n)
            .map(|_| if rng.gen::<f64>() < 0.5 { Spin::Up } else { Spin::Down })
            .collect();
        Ok(SquareLattice { L, S })
    }

    /// A lattice with every spin pointing the same way.
    pub fn aligned(L: usize, spin: Spin) -> Result<SquareLattice> {
        let n = check_size(L)?;
        Ok(SquareLattice { L, S: vec![spin; n] })
    }

    /// A lattice holding exactly these spin values, in storage order.
    pub fn from_spins(L: usize, values: &[i8]) -> Result<SquareLattice> {
        let n = check_size(L)?;
        if values.len() != n {
            return Err(Error::InvalidSize { L });
        }
        let mut S = Vec::with_capacity(n);
        for (index, &value) in values.iter().enumerate() {
            match Spin::from_value(value) {
                Some(s) => S.push(s),
                None => return Err(Error::InvalidSpin { index, value }),
            }
        }
        Ok(SquareLattice { L, S })
    }

    /// The side length `L`.
    #[inline]
    pub fn side_length(&self) -> usize {
        self.L
    }

    /// The number of sites, `L*L`.
    #[inline]
    pub fn num_sites(&self) -> usize {
        self.S.len()
    }

    /// The position in storage of site `(x, y)`, wrapping both
    /// coordinates periodically.
    #[inline]
    pub fn index(&self, x: isize, y: isize) -> usize {
        let L = self.L as isize;
        (x.rem_euclid(L) + y.rem_euclid(L) * L) as usize
    }

    /// The spin at `(x, y)`.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> Spin {
        self.S[self.index(x, y)]
    }

    /// Set the spin at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, spin: Spin) {
        let i = self.index(x, y);
        self.S[i] = spin;
    }

    /// Reverse the spin at `(x, y)`.
    #[inline]
    pub fn flip(&mut self, x: isize, y: isize) {
        let i = self.index(x, y);
        self.S[i] = self.S[i].flipped();
    }

    /// All the spins, in storage order.
    pub fn spins(&self) -> &[Spin] {
        &self.S
    }

    /// The spin values as integers, in storage order.
    pub fn values(&self) -> Vec<i8> {
        self.S.iter().map(|s| s.value()).collect()
    }

    /// One row of constant `y`.
    pub fn row(&self, y: usize) -> &[Spin] {
        let start = (y % self.L) * self.L;
        &self.S[start..start + self.L]
    }

    /// The total magnetization, the sum of all spins.
    pub fn magnetization(&self) -> i64 {
        self.S.iter().map(|&s| s.value() as i64).sum()
    }
}

fn check_size(L: usize) -> Result<usize> {
    // Coordinates are drawn as u32, and must also fit in an isize.
    if L == 0 || L > std::u32::MAX as usize || L > std::isize::MAX as usize {
        return Err(Error::InvalidSize { L });
    }
    L.checked_mul(L).ok_or(Error::InvalidSize { L })
}
