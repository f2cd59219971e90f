use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use colored::{ColoredString, Colorize};
use pacman_types::{
    types::{AgentPositionGettableGame, BoardGettableGame, FoodGettableGame, SimulableGame},
    PacmanGame, Position, PACMAN_AGENT_INDEX,
};

pub(crate) fn load(path: &Path) -> Result<PacmanGame> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read layout {}", path.display()))?;

    PacmanGame::from_layout(&contents)
        .wrap_err_with(|| format!("Could not parse layout {}", path.display()))
}

fn cell(game: &PacmanGame, position: Position) -> ColoredString {
    if game.get_agent_position(PACMAN_AGENT_INDEX) == Some(position) {
        return "P".yellow().bold();
    }

    if let Some(ghost) =
        (1..game.num_agents()).find(|&i| game.get_agent_position(i) == Some(position))
    {
        return if game.scared_timer(ghost) > 0 {
            "G".cyan()
        } else {
            "G".red().bold()
        };
    }

    if game.board().is_wall(&position) {
        "%".blue()
    } else if game.get_capsules().contains(&position) {
        "o".white().bold()
    } else if game.get_food().contains(&position) {
        ".".white()
    } else {
        " ".normal()
    }
}

/// The board as coloured text, one line per row
pub(crate) fn render(game: &PacmanGame) -> String {
    let board = game.board();

    (0..board.height())
        .map(|row| {
            (0..board.width())
                .map(|col| cell(game, Position::new(row, col)).to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
