//! The Metropolis algorithm with single spin flips.

#![allow(non_snake_case)]

use super::plugin::{self, Action, Plugin};
use super::*;
use crate::error::{self, check_temperature, Error};
use crate::rng::{self, MyRng};
use crate::system::ising::{Ising, IsingParams};

use auto_args::AutoArgs;
use rand::Rng;
use std::default::Default;

const VERSION: &str = git_version::git_version!(fallback = "unknown");

/// The parameters needed to configure a simulation.
#[derive(Debug, AutoArgs, Clone)]
pub struct MCParams {
    /// The temperature
    pub T: f64,
    /// The seed for the random number generator (default: from the clock)
    pub seed: Option<u64>,
    /// Change the temperature by this much after each sweep
    pub dT: Option<f64>,
    /// report input
    pub _report: plugin::ReportParams,
    /// display
    pub _render: plugin::RenderParams,
    /// trace output
    pub _trace: plugin::TraceParams,
}

impl Default for MCParams {
    fn default() -> Self {
        MCParams {
            T: 3.0,
            seed: None,
            dT: None,
            _report: plugin::ReportParams::default(),
            _render: plugin::RenderParams::default(),
            _trace: plugin::TraceParams::default(),
        }
    }
}

/// Everything we read from the command line.
#[derive(Debug, AutoArgs)]
pub struct Params {
    /// The system
    pub _sys: IsingParams,
    /// The simulation
    pub _mc: MCParams,
}

/// Decide whether to accept a move that changes the energy by `dE`.
///
/// Moves that do not raise the energy are always accepted, without
/// drawing a random number.  Otherwise we draw `r` uniformly in
/// `[0, 1)` and accept if `r < exp(-beta dE)`.
#[inline]
pub fn accepts(dE: Energy, beta: f64, rng: &mut MyRng) -> bool {
    dE <= 0.0 || rng.gen::<f64>() < (-beta * dE).exp()
}

/// Attempt `num_sites` single moves at inverse temperature `beta`,
/// returning how many were accepted.
pub fn sweep<S: MovableSystem>(system: &mut S, beta: f64, rng: &mut MyRng) -> u64 {
    let mut accepted = 0;
    for _ in 0..system.num_sites() {
        let dE = system.plan_move(rng);
        if accepts(dE, beta, rng) {
            system.confirm();
            accepted += 1;
        }
    }
    accepted
}

/// A Metropolis simulation of the Ising model at a (possibly slowly
/// changing) temperature.
pub struct Metropolis {
    /// The temperature
    T: f64,
    /// The amount to change the temperature after each sweep, if we
    /// are annealing.
    dT: Option<f64>,
    /// The seed we started from.
    pub seed: u64,
    /// The system we are simulating.
    pub system: Ising,
    /// The random number generator.
    pub rng: MyRng,
    /// The number of sweeps that have been made.
    pub sweeps: u64,
    /// The number of moves that have been made.
    pub moves: u64,
    /// The number of moves that have been accepted.
    pub accepted_moves: u64,

    report: plugin::Report,
    render: plugin::Render,
    trace: plugin::Trace,
}

impl Metropolis {
    /// Create a new simulation.
    pub fn from_params(params: MCParams, sys: IsingParams) -> error::Result<Self> {
        let T = check_temperature(params.T)?;
        if let Some(dT) = params.dT {
            if !dT.is_finite() {
                return Err(Error::InvalidTemperature { T: T + dT });
            }
        }
        let seed = params.seed.unwrap_or_else(rng::seed_from_clock);
        let mut rng = rng::from_seed(seed);
        let system = Ising::from_params(sys, &mut rng)?;
        Ok(Metropolis {
            T,
            dT: params.dT,
            seed,
            system,
            rng,
            sweeps: 0,
            moves: 0,
            accepted_moves: 0,
            report: plugin::Report::from(params._report),
            render: plugin::Render::from(params._render),
            trace: plugin::Trace::new(params._trace)?,
        })
    }

    /// Create a simulation of the system we are handed, with quiet
    /// default plugins.
    pub fn with_system(system: Ising, T: f64, seed: u64) -> error::Result<Self> {
        Ok(Metropolis {
            T: check_temperature(T)?,
            dT: None,
            seed,
            system,
            rng: rng::from_seed(seed),
            sweeps: 0,
            moves: 0,
            accepted_moves: 0,
            report: plugin::Report::from(plugin::ReportParams::default()),
            render: plugin::Render::from(plugin::RenderParams::default()),
            trace: plugin::Trace::new(plugin::TraceParams::default())?,
        })
    }

    /// Create a new simulation from command-line flags.
    pub fn from_args() -> error::Result<Self> {
        println!("git version: {}", VERSION);
        let Params { _sys, _mc } = Params::from_args();
        let mc = Self::from_params(_mc, _sys)?;
        println!("seed: {}", mc.seed);
        Ok(mc)
    }

    /// Replace the renderer that frames are drawn with.
    pub fn set_renderer(&mut self, renderer: Box<dyn crate::render::Renderer>) {
        self.render.set_renderer(renderer);
    }

    /// The coupling constant.
    pub fn coupling(&self) -> Energy {
        self.system.coupling()
    }

    /// The total energy, recomputed from the spins.
    pub fn total_energy(&self) -> Energy {
        self.system.energy()
    }

    /// Change the temperature between sweeps.  The spins are left as
    /// they are.
    pub fn set_temperature(&mut self, T: f64) -> error::Result<()> {
        self.T = check_temperature(T)?;
        Ok(())
    }

    /// The per-sweep temperature change, if we are annealing.
    pub fn annealing_step(&self) -> Option<f64> {
        self.dT
    }

    /// Turn annealing on or off.
    pub fn set_annealing_step(&mut self, dT: Option<f64>) {
        self.dT = dT;
    }

    /// Apply one step of the annealing schedule.  A step that would
    /// leave the temperature non-positive is refused, and the old
    /// temperature is kept.
    pub fn anneal(&mut self) -> error::Result<()> {
        if let Some(dT) = self.dT {
            self.set_temperature(self.T + dT)?;
        }
        Ok(())
    }

    /// Run one round: a sweep, the plugins, then an annealing step.
    pub fn run_once(&mut self) -> error::Result<Action> {
        self.sweep();
        let todo = {
            let plugins = [
                &self.report as &dyn Plugin<Self>,
                &self.render,
                &self.trace,
            ];
            plugin::run_plugins(self, &self.system, &plugins)?
        };
        if todo < Action::Exit {
            self.anneal()?;
        }
        Ok(todo)
    }

    /// Run until the report says we are done.  If something goes
    /// wrong along the way, whatever output we have is still saved.
    pub fn run(&mut self) -> error::Result<()> {
        loop {
            match self.run_once() {
                Ok(Action::Exit) => {
                    println!("All done!");
                    return Ok(());
                }
                Ok(_) => (),
                Err(e) => {
                    self.save()?;
                    return Err(e);
                }
            }
        }
    }

    /// Ask every plugin to save what it has.
    pub fn save(&self) -> error::Result<()> {
        let plugins = [
            &self.report as &dyn Plugin<Self>,
            &self.render,
            &self.trace,
        ];
        for p in plugins.iter() {
            p.save(self, &self.system)?;
        }
        Ok(())
    }
}

impl MonteCarlo for Metropolis {
    type System = Ising;
    fn sweep(&mut self) {
        // beta is taken fresh, since the temperature may have changed.
        let beta = 1.0 / self.T;
        let accepted = sweep(&mut self.system, beta, &mut self.rng);
        self.moves += self.system.num_sites() as u64;
        self.accepted_moves += accepted;
        self.sweeps += 1;
    }
    fn system(&self) -> &Ising {
        &self.system
    }
    fn temperature(&self) -> f64 {
        self.T
    }
    fn num_sweeps(&self) -> u64 {
        self.sweeps
    }
    fn num_moves(&self) -> u64 {
        self.moves
    }
    fn num_accepted_moves(&self) -> u64 {
        self.accepted_moves
    }
}
