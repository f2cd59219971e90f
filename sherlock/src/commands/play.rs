use std::{fs::File, io::BufReader, path::PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use colored::Colorize;
use itertools::Itertools;
use pacman_rs::{
    agents::{all_factories, factory_by_name, BoxedAgent, RandomAgent},
    runner::run_game,
    MinimaxOptions,
};
use pacman_types::{types::SimulableGame, Outcome};
use rand::{rngs::StdRng, SeedableRng};

use crate::layout;

#[derive(clap::Args, Debug)]
pub(crate) struct Play {
    /// Layout file to play on
    #[clap(short, long, value_parser)]
    layout: PathBuf,

    /// Name of the pacman agent
    #[clap(short, long, value_parser, default_value = "reflex")]
    agent: String,

    /// Search depth for the minimax agents. Overrides the depth in --options
    #[clap(short, long, value_parser)]
    depth: Option<usize>,

    /// Seed for the game's random number generator. Picked at random if not specified
    #[clap(short, long, value_parser)]
    seed: Option<u64>,

    /// Give up after this many moves, counting every agent
    #[clap(short, long, value_parser, default_value_t = 1000)]
    max_moves: usize,

    /// JSON file holding the minimax options
    #[clap(short, long, value_parser)]
    options: Option<PathBuf>,

    /// Print the board after every move
    #[clap(short, long, value_parser, default_value_t = false)]
    render: bool,

    /// Print the result as JSON instead of text
    #[clap(long, value_parser, default_value_t = false)]
    json: bool,
}

fn load_options(path: Option<&PathBuf>, depth: Option<usize>) -> Result<MinimaxOptions> {
    let mut options: MinimaxOptions = match path {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("Could not open options file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .wrap_err_with(|| format!("Could not parse options file {}", path.display()))?
        }
        None => MinimaxOptions::default(),
    };

    if let Some(depth) = depth {
        options.depth = depth;
    }

    Ok(options)
}

impl Play {
    pub(crate) fn run(self) -> Result<()> {
        let game = layout::load(&self.layout)?;
        let options = load_options(self.options.as_ref(), self.depth)?;

        let factory = factory_by_name(&self.agent).ok_or_else(|| {
            eyre!(
                "Unknown agent {:?}, expected one of {}",
                self.agent,
                all_factories().iter().map(|f| f.name()).join(", ")
            )
        })?;

        let mut agents: Vec<BoxedAgent> = vec![factory.create(&options)];
        for _ in 1..game.num_agents() {
            agents.push(Box::new(RandomAgent::default()));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let result = run_game(game, &mut agents, self.max_moves, &mut rng, |state| {
            if self.render {
                println!("Turn {}", state.turn());
                println!("{}\n", layout::render(state));
            }
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        let headline = match result.outcome {
            Some(Outcome::Won) => "Pacman won".green().bold(),
            Some(Outcome::Lost) => "Pacman lost".red().bold(),
            None => format!("Stopped after {} moves", self.max_moves).yellow(),
        };
        println!(
            "{headline} with a score of {} in {} moves (seed {seed})",
            result.score, result.moves
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pacman_rs::AdversaryModel;

    use super::*;

    #[test]
    fn test_depth_overrides_the_options_file() {
        let path = std::env::temp_dir().join(format!(
            "sherlock-depth-override-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        File::create(&path)
            .unwrap()
            .write_all(br#"{"depth": 4, "adversary_model": "expecting"}"#)
            .unwrap();

        let from_file = load_options(Some(&path), None).unwrap();
        assert_eq!(from_file.depth, 4);
        assert_eq!(from_file.adversary_model, AdversaryModel::Expecting);

        let overridden = load_options(Some(&path), Some(1)).unwrap();
        assert_eq!(overridden.depth, 1);
        assert_eq!(overridden.adversary_model, AdversaryModel::Expecting);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_defaults_without_a_file() {
        let options = load_options(None, None).unwrap();

        assert_eq!(options, MinimaxOptions::default());
    }
}
