extern crate isingmc;

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use isingmc::mc::metropolis::{MCParams, Metropolis};
use isingmc::mc::MonteCarlo;
use isingmc::prettyfloat::PrettyFloat;
use isingmc::render::TerminalRenderer;
use isingmc::system::ising::IsingParams;
use isingmc::system::System;

fn scenario(seed: u64) -> Metropolis {
    let mut params = MCParams::default();
    params.T = 3.0;
    params.seed = Some(seed);
    Metropolis::from_params(params, IsingParams { L: 5, J: Some(1.0) }).unwrap()
}

#[test]
fn seed_67_starts_from_a_known_configuration() {
    let mc = scenario(67);
    #[rustfmt::skip]
    let expected: Vec<i8> = vec![
        -1, -1,  1,  1, -1,
        -1, -1, -1,  1,  1,
         1, -1,  1,  1,  1,
        -1,  1, -1, -1,  1,
         1, -1,  1,  1,  1,
    ];
    assert_eq!(mc.system.lattice().values(), expected);
    assert_eq!(mc.total_energy(), 2.0);
    assert_eq!(mc.system.magnetization(), 3);
}

#[test]
fn thousand_sweeps_are_reproducible() {
    let mut a = scenario(67);
    let mut b = scenario(67);
    for _ in 0..1000 {
        a.sweep();
        b.sweep();
    }
    assert_eq!(a.system.lattice(), b.system.lattice());
    assert_eq!(a.num_accepted_moves(), b.num_accepted_moves());
    assert_eq!(a.num_moves(), 25_000);
    for &v in a.system.lattice().values().iter() {
        assert!(v == 1 || v == -1);
    }
}

#[test]
fn energy_is_recomputed_not_tracked() {
    let mut mc = scenario(67);
    mc.sweep();
    let e = mc.total_energy();
    assert_eq!(e, mc.system.energy());
    // Whatever we do to the spins by hand shows up at once.
    mc.system.lattice_mut().flip(0, 0);
    let de = -mc.system.flip_energy(0, 0);
    assert_eq!(mc.total_energy(), e + de);
}

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn every_round_is_rendered() {
    let mut params = MCParams::default();
    params.T = 2.0;
    params.seed = Some(1);
    params._report.max_iter = Some(3);
    let mut mc = Metropolis::from_params(params, IsingParams { L: 4, J: None }).unwrap();
    let buf = SharedBuf::default();
    mc.set_renderer(Box::new(TerminalRenderer::new(buf.clone(), false)));
    mc.run().unwrap();

    let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // Four rows of spins and a line of observables per sweep.
    assert_eq!(lines.len(), 3 * 5);
    for frame in lines.chunks(5) {
        for row in &frame[..4] {
            assert_eq!(row.len(), 7);
            assert!(row.split(' ').all(|g| g == "+" || g == "-"));
        }
        assert!(frame[4].starts_with("T = 2  E = "));
    }
    let last = format!("E = {}", PrettyFloat(mc.total_energy()));
    assert!(lines[14].ends_with(&last), "{} vs {}", lines[14], last);
}
