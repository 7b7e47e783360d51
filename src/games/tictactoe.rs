use std::fmt;

const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Tie,
}

/// Two-player tic-tac-toe on one keyboard. X always moves first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    board: [Option<Player>; 9],
    current: Player,
    outcome: Option<Outcome>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Player::X,
            outcome: None,
        }
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn cell(&self, index: usize) -> Option<Player> {
        self.board.get(index).copied().flatten()
    }

    /// Board as three text rows separated by box-drawing rules, with a leading newline
    pub fn render_board(&self) -> String {
        let mut out = String::from("\n");
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    self.cell(row * 3 + col)
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| " ".to_string())
                })
                .collect();
            out.push_str(&format!(" {} │ {} │ {} \n", cells[0], cells[1], cells[2]));
            if row < 2 {
                out.push_str("───┼───┼───\n");
            }
        }
        out
    }

    fn evaluate(board: &[Option<Player>; 9]) -> Option<Outcome> {
        for [a, b, c] in WIN_LINES {
            if let Some(player) = board[a] {
                if board[b] == Some(player) && board[c] == Some(player) {
                    return Some(Outcome::Win(player));
                }
            }
        }
        if board.iter().all(Option::is_some) {
            Some(Outcome::Tie)
        } else {
            None
        }
    }

    /// Place the current player's mark at `position` (1-9, as typed).
    /// Rejected moves leave the game untouched.
    pub fn play(mut self, position: &str) -> (Self, String) {
        if self.is_over() {
            return (
                self,
                "Game is over! Type \"games exit\" to quit or \"games tictactoe\" to start a new game."
                    .to_string(),
            );
        }

        let index = match position.trim().parse::<usize>() {
            Ok(n @ 1..=9) => n - 1,
            _ => {
                return (
                    self,
                    "Invalid move! Please enter a number between 1 and 9.".to_string(),
                )
            }
        };

        if self.board[index].is_some() {
            return (self, "That position is already taken! Try another.".to_string());
        }

        self.board[index] = Some(self.current);
        self.outcome = Self::evaluate(&self.board);

        let mut message = self.render_board();
        message.push('\n');
        match self.outcome {
            Some(Outcome::Tie) => message.push_str("It's a tie!"),
            Some(Outcome::Win(player)) => message.push_str(&format!("Player {} wins!", player)),
            None => {
                self.current = self.current.other();
                message.push_str(&format!("Player {}'s turn!", self.current));
            }
        }
        (self, message)
    }
}
