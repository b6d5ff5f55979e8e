extern crate isingmc;

use isingmc::mc::metropolis::Metropolis;

fn main() -> anyhow::Result<()> {
    let mut mc = Metropolis::from_args()?;
    mc.run()?;
    Ok(())
}
