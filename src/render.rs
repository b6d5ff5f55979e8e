//! Showing the spins to a human.
//!
//! The simulation only ever hands out a [`Frame`]; how it is drawn is
//! up to a [`Renderer`].  Terminal control codes live here and
//! nowhere else.

#![allow(non_snake_case)]

use crate::prettyfloat::PrettyFloat;
use crate::system::ising::Ising;
use crate::system::lattice::{SquareLattice, Spin};
use crate::system::{Energy, System};

use std::io::{self, Write};

/// Clear the screen and move the cursor to the top left.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// What there is to see after one sweep.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// The spins.
    pub lattice: &'a SquareLattice,
    /// The temperature the sweep ran at.
    pub T: f64,
    /// The total energy.
    pub E: Energy,
    /// The magnetization.
    pub M: i64,
}

impl<'a> Frame<'a> {
    /// Take a look at the system.
    pub fn new(system: &'a Ising, T: f64) -> Frame<'a> {
        Frame {
            lattice: system.lattice(),
            T,
            E: system.energy(),
            M: system.magnetization(),
        }
    }
}

/// Something that can draw frames.
pub trait Renderer {
    /// Draw one frame, replacing whatever was drawn before.
    fn render(&mut self, frame: &Frame) -> io::Result<()>;
}

/// The character we draw for a spin.
pub fn glyph(s: Spin) -> char {
    match s {
        Spin::Up => '+',
        Spin::Down => '-',
    }
}

/// Draws frames as text.  Each row of the lattice becomes a line of
/// `+` and `-`, followed by a line giving the temperature and energy.
pub struct TerminalRenderer<W> {
    out: W,
    clear: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Draw to standard output, clearing the screen between frames.
    pub fn stdout() -> Self {
        TerminalRenderer {
            out: io::stdout(),
            clear: true,
        }
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Draw to any writer.  Set `clear` to repaint in place on a
    /// terminal, or leave it off to get one frame after another.
    pub fn new(out: W, clear: bool) -> Self {
        TerminalRenderer { out, clear }
    }

    /// Get the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        let mut text = String::new();
        if self.clear {
            text.push_str(CLEAR);
        }
        let L = frame.lattice.side_length();
        for y in 0..L {
            for (x, &s) in frame.lattice.row(y).iter().enumerate() {
                if x > 0 {
                    text.push(' ');
                }
                text.push(glyph(s));
            }
            text.push('\n');
        }
        text.push_str(&format!(
            "T = {:.4}  E = {}\n",
            PrettyFloat(frame.T),
            PrettyFloat(frame.E)
        ));
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_rows_then_observables() {
        let lattice = SquareLattice::from_spins(3, &[1, -1, 1, -1, -1, -1, 1, 1, 1]).unwrap();
        let ising = Ising::new(lattice, 1.0).unwrap();
        let mut r = TerminalRenderer::new(Vec::new(), false);
        r.render(&Frame::new(&ising, 2.269)).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "+ - +");
        assert_eq!(lines[1], "- - -");
        assert_eq!(lines[2], "+ + +");
        assert_eq!(lines[3], "T = 2.269  E = -2");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn labels_show_the_whole_number() {
        let ising = Ising::new(SquareLattice::aligned(2, Spin::Up).unwrap(), 1.0).unwrap();
        let label = |T: f64| {
            let mut r = TerminalRenderer::new(Vec::new(), false);
            r.render(&Frame::new(&ising, T)).unwrap();
            let text = String::from_utf8(r.into_inner()).unwrap();
            text.lines().last().unwrap().to_string()
        };
        assert_eq!(label(0.001), "T = 0.001  E = -8");
        assert_eq!(label(12.345), "T = 12.35  E = -8");
        assert_eq!(label(2.0), "T = 2  E = -8");
    }

    #[test]
    fn clearing_uses_escape_codes() {
        let lattice = SquareLattice::aligned(2, Spin::Down).unwrap();
        let ising = Ising::new(lattice, 1.0).unwrap();
        let mut r = TerminalRenderer::new(Vec::new(), true);
        r.render(&Frame::new(&ising, 1.0)).unwrap();
        r.render(&Frame::new(&ising, 1.0)).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.starts_with(CLEAR));
        assert_eq!(text.matches(CLEAR).count(), 2);
        assert!(text.contains("- -\n- -\n"));
    }

    #[test]
    fn frame_carries_observables() {
        let lattice = SquareLattice::aligned(4, Spin::Up).unwrap();
        let ising = Ising::new(lattice, 1.0).unwrap();
        let frame = Frame::new(&ising, 3.0);
        assert_eq!(frame.E, -32.0);
        assert_eq!(frame.M, 16);
        assert_eq!(frame.T, 3.0);
    }
}
