pub mod play;
pub mod solve;

use play::Play;
use solve::Solve;

use clap::Subcommand;
use color_eyre::eyre::Result;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run one graph search over a layout and print the path it finds
    Solve(Solve),
    /// Play a full game with the chosen pacman agent against random ghosts
    Play(Play),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Solve(s) => s.run()?,
            Command::Play(p) => p.run()?,
        }

        Ok(())
    }
}
