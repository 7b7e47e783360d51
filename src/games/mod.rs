//! Terminal mini-games
//!
//! Each game is a plain value whose moves consume the old state and return
//! the next one together with the message to print. [`GameState`] holds the
//! game a session is currently playing.

mod number_guess;
mod tictactoe;

pub use number_guess::{NumberGuess, MAX_NUMBER, MAX_TRIES, MIN_NUMBER};
pub use tictactoe::{Outcome, Player, TicTacToe};

pub const GAMES_HELP: &str = "Available games:
1. tictactoe - Classic Tic Tac Toe game
2. guess - Number guessing game

Usage:
  games <game_name> - Start a game
  games help - Show this help message

During games:
  games move <position> - Make a move in Tic Tac Toe (1-9)
  games guess <number> - Make a guess (1-100)
  games exit - Quit current game";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveGame {
    TicTacToe(TicTacToe),
    NumberGuess(NumberGuess),
}

impl ActiveGame {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveGame::TicTacToe(_) => "tictactoe",
            ActiveGame::NumberGuess(_) => "guess",
        }
    }
}

/// The game a session is playing, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    active: Option<ActiveGame>,
}

impl GameState {
    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref()
    }

    /// Start (or restart) a game by name
    pub fn start(&mut self, game: &str) -> String {
        match game {
            "tictactoe" => self.start_tictactoe(),
            "guess" => self.start_guess(NumberGuess::new()),
            other => format!(
                "Game '{}' not found. Type 'games help' to see available games.",
                other
            ),
        }
    }

    pub fn start_tictactoe(&mut self) -> String {
        let game = TicTacToe::new();
        let board = game.render_board();
        self.active = Some(ActiveGame::TicTacToe(game));
        format!(
            "Welcome to Tic Tac Toe!

Instructions:
- Enter a number (1-9) to place your mark
- Numbers correspond to positions:
 1 │ 2 │ 3
───┼───┼───
 4 │ 5 │ 6
───┼───┼───
 7 │ 8 │ 9

Type 'games move <position>' to play (e.g., 'games move 5' for center)
Type 'games exit' to quit the game

{}
Player X's turn!",
            board
        )
    }

    pub fn start_guess(&mut self, game: NumberGuess) -> String {
        let tries = game.tries_left();
        self.active = Some(ActiveGame::NumberGuess(game));
        format!(
            "Welcome to the Number Guessing Game!

I'm thinking of a number between {} and {}.
Type 'games guess <number>' to make a guess.
Type 'games exit' to quit the game.

You have {} tries remaining. Good luck!",
            MIN_NUMBER, MAX_NUMBER, tries
        )
    }

    /// Play a tic-tac-toe move; `position` is the raw typed argument
    pub fn play_move(&mut self, position: Option<&str>) -> String {
        let Some(ActiveGame::TicTacToe(game)) = &self.active else {
            return "No Tic Tac Toe game in progress. Type \"games tictactoe\" to start one!"
                .to_string();
        };
        let Some(position) = position else {
            return "Usage: games move <position> - Enter a position (1-9) to place your mark"
                .to_string();
        };

        let (game, message) = game.clone().play(position);
        self.active = Some(ActiveGame::TicTacToe(game));
        message
    }

    /// Score a guess in the number game
    pub fn guess(&mut self, number: &str) -> String {
        let Some(ActiveGame::NumberGuess(game)) = &self.active else {
            return "No Number Guessing game in progress. Type \"games guess\" to start one!"
                .to_string();
        };

        let (game, message) = game.clone().guess(number);
        self.active = Some(ActiveGame::NumberGuess(game));
        message
    }

    pub fn exit(&mut self) -> String {
        match self.active.take() {
            Some(game) => format!(
                "Exited {}. Type \"games\" to see available games!",
                game.name()
            ),
            None => "No game in progress.".to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
