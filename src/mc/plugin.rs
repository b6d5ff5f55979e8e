//! A plugin architecture to keep reporting, display and output
//! separate from the Monte Carlo algorithm itself.

#![allow(non_snake_case)]

use super::*;
use crate::atomicfile::AtomicFile;
use crate::error::{self, Error};
use crate::prettyfloat::PrettyFloat;
use crate::render::{Frame, Renderer, TerminalRenderer};
use crate::system::ising::Ising;

use auto_args::AutoArgs;
use std::cell::RefCell;
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time;

/// The number of sweeps we run if nobody says otherwise.
pub const DEFAULT_MAX_ITER: u64 = 1000;

/// A `Plugin` is an object that watches a MonteCarlo simulation.  The
/// plugin is called after every sweep, and will have a chance to
/// show or record data and/or terminate the simulation.
pub trait Plugin<MC: MonteCarlo> {
    /// Run and do something.  If you want to modify information, you
    /// will have to use interior mutability, because the plugin only
    /// gets to look at the `MC`.
    fn run(&self, _mc: &MC, _sys: &MC::System) -> error::Result<Action> {
        Ok(Action::None)
    }
    /// We are about to stop, so please write out anything worth
    /// keeping.  This is called in response to `Action::Save` and
    /// `Action::Exit`.
    fn save(&self, _mc: &MC, _sys: &MC::System) -> error::Result<()> {
        Ok(())
    }
    /// Log to stdout any interesting data we think our user might
    /// care about.  This is called in response to `Action::Save`,
    /// `Action::Log` and `Action::Exit`.
    fn log(&self, _mc: &MC, _sys: &MC::System) {}
}

/// An action that should be taken based on this plugin's decision.
#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub enum Action {
    /// Nothing special need be done.
    None,
    /// Log interesting information.
    Log,
    /// Save things.
    Save,
    /// Stop the simulation.
    Exit,
}
impl Action {
    /// Do both of two actions.
    pub fn and(self, other: Action) -> Action {
        ::std::cmp::max(self, other)
    }
}

/// Run all the plugins, then log and save as they requested.  The
/// combined action is returned so the caller can stop if asked to.
pub fn run_plugins<MC: MonteCarlo>(
    mc: &MC,
    sys: &MC::System,
    plugins: &[&dyn Plugin<MC>],
) -> error::Result<Action> {
    let mut todo = Action::None;
    for p in plugins.iter() {
        todo = todo.and(p.run(mc, sys)?);
    }
    if todo >= Action::Log {
        for p in plugins.iter() {
            p.log(mc, sys);
        }
    }
    if todo >= Action::Save {
        for p in plugins.iter() {
            p.save(mc, sys)?;
        }
    }
    Ok(todo)
}

/// The parameters to define the report information as well as stop
/// time (which is part of the report).
#[derive(AutoArgs, Debug, Clone)]
pub struct ReportParams {
    /// The number of sweeps to run (default 1000).
    pub max_iter: Option<u64>,
    /// Print a progress report this often, in sweeps.
    pub report_every: Option<u64>,
    /// Do not make reports!
    pub quiet: bool,
}

impl Default for ReportParams {
    fn default() -> Self {
        ReportParams {
            max_iter: None,
            report_every: None,
            quiet: true,
        }
    }
}

/// A plugin that reports progress and terminates the simulation after
/// a fixed number of sweeps.
#[derive(Debug, Clone)]
pub struct Report {
    max_iter: u64,
    report_every: Option<u64>,
    /// This is when the simulation started.
    start: time::Instant,
    /// The user has requested that nothing be printed!
    pub quiet: bool,
}

impl From<ReportParams> for Report {
    fn from(params: ReportParams) -> Self {
        Report {
            max_iter: params.max_iter.unwrap_or(DEFAULT_MAX_ITER),
            report_every: params.report_every.filter(|&n| n > 0),
            start: time::Instant::now(),
            quiet: params.quiet,
        }
    }
}

impl Report {
    /// The number of sweeps after which we stop.
    pub fn max_iter(&self) -> u64 {
        self.max_iter
    }
}

impl<MC: MonteCarlo<System = Ising>> Plugin<MC> for Report {
    fn run(&self, mc: &MC, _sys: &MC::System) -> error::Result<Action> {
        let sweeps = mc.num_sweeps();
        if sweeps >= self.max_iter {
            return Ok(Action::Exit);
        }
        match self.report_every {
            Some(n) if sweeps % n == 0 => Ok(Action::Log),
            _ => Ok(Action::None),
        }
    }
    fn log(&self, mc: &MC, sys: &MC::System) {
        if self.quiet {
            return;
        }
        let sweeps = mc.num_sweeps();
        let runtime = self.start.elapsed();
        let time_per_sweep = duration_to_secs(runtime) / sweeps.max(1) as f64;
        let frac_complete = sweeps as f64 / self.max_iter as f64;
        let sweeps_left = self.max_iter.saturating_sub(sweeps);
        let time_left = (time_per_sweep * sweeps_left as f64) as u64;
        println!(
            "[{}] {}% complete after {} ({} left, {:.1}us per sweep)",
            PrettyFloat(sweeps as f64),
            (100. * frac_complete) as isize,
            format_duration(runtime.as_secs()),
            format_duration(time_left),
            PrettyFloat(time_per_sweep * 1e6)
        );
        let N = sys.lattice().num_sites() as f64;
        println!(
            "    T = {:.4}  E = {:.6}  E/N = {:.4}  M/N = {:.4}",
            PrettyFloat(mc.temperature()),
            PrettyFloat(sys.energy()),
            PrettyFloat(sys.energy() / N),
            PrettyFloat(sys.magnetization() as f64 / N)
        );
    }
    fn save(&self, mc: &MC, _sys: &MC::System) -> error::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let accepted = mc.num_accepted_moves();
        let moves = mc.num_moves();
        if moves > 0 {
            println!(
                "        Accepted {:.2}/{:.2} = {:.0}% of the moves",
                PrettyFloat(accepted as f64),
                PrettyFloat(moves as f64),
                100.0 * accepted as f64 / moves as f64
            );
        }
        Ok(())
    }
}

/// How long we pause between frames, in milliseconds, unless told
/// otherwise.
pub const DEFAULT_DELAY_MS: u64 = 250;

/// Do we want to watch the spins?
#[derive(AutoArgs, Debug, Clone)]
pub struct RenderParams {
    /// Do not draw the spins after each sweep
    pub no_display: bool,
    /// Pause this many milliseconds between sweeps (default 250 when drawing)
    pub delay: Option<u64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            no_display: true,
            delay: None,
        }
    }
}

/// A plugin that hands each sweep's spins to a `Renderer`, and then
/// waits a while so a human can see them.
pub struct Render {
    display: bool,
    delay: Option<time::Duration>,
    renderer: RefCell<Box<dyn Renderer>>,
}

impl From<RenderParams> for Render {
    fn from(params: RenderParams) -> Self {
        let display = !params.no_display;
        let ms = match params.delay {
            Some(ms) => ms,
            None if display => DEFAULT_DELAY_MS,
            None => 0,
        };
        Render {
            display,
            delay: Some(ms).filter(|&ms| ms > 0).map(time::Duration::from_millis),
            renderer: RefCell::new(Box::new(TerminalRenderer::stdout())),
        }
    }
}

impl Render {
    /// Draw with a different renderer from now on.  This also turns
    /// the display on.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.display = true;
        self.renderer = RefCell::new(renderer);
    }
}

impl<MC: MonteCarlo<System = Ising>> Plugin<MC> for Render {
    fn run(&self, mc: &MC, sys: &MC::System) -> error::Result<Action> {
        if self.display {
            let frame = Frame::new(sys, mc.temperature());
            self.renderer.borrow_mut().render(&frame)?;
        }
        if let Some(delay) = self.delay {
            ::std::thread::sleep(delay);
        }
        Ok(Action::None)
    }
}

/// Where do we record the simulation?
#[derive(AutoArgs, Debug, Clone)]
pub struct TraceParams {
    /// Write a snapshot of every sweep to this file (yaml, json or cbor)
    pub save_as: Option<PathBuf>,
}

impl Default for TraceParams {
    fn default() -> Self {
        TraceParams { save_as: None }
    }
}

/// The file formats a trace can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// `.yaml`
    Yaml,
    /// `.json`
    Json,
    /// `.cbor`
    Cbor,
}

impl TraceFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> error::Result<TraceFormat> {
        match path.extension().and_then(|x| x.to_str()) {
            Some("yaml") => Ok(TraceFormat::Yaml),
            Some("json") => Ok(TraceFormat::Json),
            Some("cbor") => Ok(TraceFormat::Cbor),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// The state of the simulation right after one sweep.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Which sweep this was, counting from 1.
    pub sweep: u64,
    /// The temperature the sweep ran at.
    pub T: f64,
    /// The total energy afterwards.
    pub E: Energy,
    /// The magnetization afterwards.
    pub M: i64,
    /// The spins, in storage order.
    pub spins: Vec<i8>,
}

/// Everything we write to a trace file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TraceFile {
    /// The seed the run started from.
    pub seed: Option<u64>,
    /// The side length.
    pub L: usize,
    /// The coupling constant.
    pub J: Energy,
    /// One entry per sweep.
    pub frames: Vec<Snapshot>,
}

/// A plugin that records every sweep, and writes them all out when
/// the simulation stops.
#[derive(Debug)]
pub struct Trace {
    save_as: Option<(PathBuf, TraceFormat)>,
    frames: RefCell<Vec<Snapshot>>,
}

impl Trace {
    /// Set up a trace.  A file name we could not write is refused now,
    /// before any sweeps are spent.
    pub fn new(params: TraceParams) -> error::Result<Trace> {
        let save_as = match params.save_as {
            Some(path) => {
                let format = TraceFormat::from_path(&path)?;
                Some((path, format))
            }
            None => None,
        };
        Ok(Trace {
            save_as,
            frames: RefCell::new(Vec::new()),
        })
    }
    /// The number of sweeps recorded so far.
    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }
    /// Have we recorded anything?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Plugin<super::metropolis::Metropolis> for Trace {
    fn run(&self, mc: &super::metropolis::Metropolis, sys: &Ising) -> error::Result<Action> {
        if self.save_as.is_some() {
            self.frames.borrow_mut().push(Snapshot {
                sweep: mc.num_sweeps(),
                T: mc.temperature(),
                E: sys.energy(),
                M: sys.magnetization(),
                spins: sys.lattice().values(),
            });
        }
        Ok(Action::None)
    }
    fn save(&self, mc: &super::metropolis::Metropolis, sys: &Ising) -> error::Result<()> {
        let (save_as, format) = match self.save_as {
            Some((ref p, format)) => (p, format),
            None => return Ok(()),
        };
        let trace = TraceFile {
            seed: Some(mc.seed),
            L: sys.lattice().side_length(),
            J: sys.coupling(),
            frames: self.frames.borrow().clone(),
        };
        write_trace(save_as, format, &trace)
    }
}

/// Write a trace atomically, so a failed write leaves nothing behind.
pub fn write_trace(save_as: &Path, format: TraceFormat, trace: &TraceFile) -> error::Result<()> {
    let f = AtomicFile::create(save_as)?;
    match format {
        TraceFormat::Yaml => serde_yaml::to_writer(&f, trace)?,
        TraceFormat::Json => serde_json::to_writer(&f, trace)?,
        TraceFormat::Cbor => serde_cbor::to_writer(&f, trace)?,
    }
    f.commit()?;
    Ok(())
}

fn format_duration(secs: u64) -> String {
    let mins = secs / 60;
    let hours = mins / 60;
    let mins = mins % 60;
    if hours > 50 {
        format!("{} hours", hours)
    } else if mins < 1 {
        format!("{} seconds", secs)
    } else if mins == 1 {
        format!("1 minute {} seconds", secs % 60)
    } else if hours < 1 {
        format!("{} minutes", mins)
    } else if hours < 2 {
        format!("1 hour, {} minutes", mins)
    } else {
        format!("{} hours, {} minutes", hours, mins)
    }
}
fn duration_to_secs(t: time::Duration) -> f64 {
    t.as_secs() as f64 + t.subsec_nanos() as f64 * 1e-9
}

#[cfg(test)]
mod tests {
    use super::super::metropolis::{MCParams, Metropolis};
    use super::*;
    use crate::system::ising::IsingParams;

    #[test]
    fn actions_combine_to_the_strongest() {
        assert_eq!(Action::None.and(Action::Log), Action::Log);
        assert_eq!(Action::Save.and(Action::Log), Action::Save);
        assert_eq!(Action::Exit.and(Action::None), Action::Exit);
    }

    #[test]
    fn durations_read_nicely() {
        assert_eq!(format_duration(5), "5 seconds");
        assert_eq!(format_duration(75), "1 minute 15 seconds");
        assert_eq!(format_duration(600), "10 minutes");
        assert_eq!(format_duration(4000), "1 hour, 6 minutes");
        assert_eq!(format_duration(3 * 3600 + 120), "3 hours, 2 minutes");
    }

    fn quiet_mc(max_iter: u64, save_as: Option<PathBuf>) -> Metropolis {
        let mut p = MCParams::default();
        p.seed = Some(12);
        p._report.max_iter = Some(max_iter);
        p._trace.save_as = save_as;
        Metropolis::from_params(p, IsingParams { L: 6, J: None }).unwrap()
    }

    #[test]
    fn report_stops_after_max_iter() {
        let mut mc = quiet_mc(3, None);
        assert_eq!(mc.run_once().unwrap(), Action::None);
        assert_eq!(mc.run_once().unwrap(), Action::None);
        assert_eq!(mc.run_once().unwrap(), Action::Exit);
    }

    #[test]
    fn report_defaults_to_a_thousand_sweeps() {
        let report = Report::from(ReportParams::default());
        assert_eq!(report.max_iter(), DEFAULT_MAX_ITER);
    }

    #[test]
    fn trace_is_written_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        for ext in &["yaml", "json", "cbor"] {
            let path = dir.path().join(format!("trace.{}", ext));
            let mut mc = quiet_mc(5, Some(path.clone()));
            mc.run().unwrap();
            let f = ::std::fs::File::open(&path).unwrap();
            let trace: TraceFile = match *ext {
                "yaml" => serde_yaml::from_reader(f).unwrap(),
                "json" => serde_json::from_reader(f).unwrap(),
                _ => serde_cbor::from_reader(f).unwrap(),
            };
            assert_eq!(trace.seed, Some(12));
            assert_eq!(trace.L, 6);
            assert_eq!(trace.frames.len(), 5);
            for (i, frame) in trace.frames.iter().enumerate() {
                assert_eq!(frame.sweep, i as u64 + 1);
                assert_eq!(frame.T, 3.0);
                assert_eq!(frame.spins.len(), 36);
            }
            let last = &trace.frames[4];
            assert_eq!(last.E, mc.total_energy());
            assert_eq!(last.spins, mc.system.lattice().values());
        }
    }

    #[test]
    fn unknown_trace_format_is_refused_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.txt");
        let mut p = MCParams::default();
        p._trace.save_as = Some(path.clone());
        match Metropolis::from_params(p, IsingParams { L: 6, J: None }) {
            Err(Error::UnknownFormat(ref bad)) if *bad == path => (),
            Err(e) => panic!("wrong error {}", e),
            Ok(_) => panic!("a .txt trace should be refused"),
        }
        assert!(!path.exists());
        assert!(TraceFormat::from_path(Path::new("trace")).is_err());
        assert_eq!(TraceFormat::from_path(Path::new("a/b.cbor")).unwrap(), TraceFormat::Cbor);
    }

    #[test]
    fn display_is_on_unless_turned_off() {
        let shown = Render::from(RenderParams {
            no_display: false,
            delay: None,
        });
        assert!(shown.display);
        assert_eq!(shown.delay, Some(time::Duration::from_millis(DEFAULT_DELAY_MS)));

        let fast = Render::from(RenderParams {
            no_display: false,
            delay: Some(0),
        });
        assert!(fast.display);
        assert_eq!(fast.delay, None);

        let hidden = Render::from(RenderParams::default());
        assert!(!hidden.display);
        assert_eq!(hidden.delay, None);
    }
}
