use rand::Rng;

pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 100;
pub const MAX_TRIES: u32 = 10;

/// Guess a hidden number between 1 and 100 in at most ten tries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberGuess {
    target: u32,
    tries_left: u32,
    over: bool,
}

impl Default for NumberGuess {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberGuess {
    pub fn new() -> Self {
        Self::with_target(rand::thread_rng().gen_range(MIN_NUMBER..=MAX_NUMBER))
    }

    pub fn with_target(target: u32) -> Self {
        Self {
            target,
            tries_left: MAX_TRIES,
            over: false,
        }
    }

    pub fn tries_left(&self) -> u32 {
        self.tries_left
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Score one typed guess. Invalid input does not cost a try.
    pub fn guess(mut self, input: &str) -> (Self, String) {
        if self.over {
            return (
                self,
                "Game is over! Type \"games exit\" to quit or \"games guess\" to start a new game."
                    .to_string(),
            );
        }

        let guess = match input.trim().parse::<u32>() {
            Ok(n) if (MIN_NUMBER..=MAX_NUMBER).contains(&n) => n,
            _ => {
                return (
                    self,
                    "Invalid guess! Please enter a number between 1 and 100.".to_string(),
                )
            }
        };

        self.tries_left -= 1;

        if guess == self.target {
            self.over = true;
            let used = MAX_TRIES - self.tries_left;
            return (
                self,
                format!(
                    "Congratulations! You guessed the number {} correctly in {} tries!",
                    guess, used
                ),
            );
        }

        if self.tries_left == 0 {
            self.over = true;
            let target = self.target;
            return (
                self,
                format!(
                    "Game Over! The number was {}. Better luck next time!",
                    target
                ),
            );
        }

        let hint = if guess > self.target {
            "Too high!"
        } else {
            "Too low!"
        };
        let message = format!("{}\nYou have {} tries remaining.", hint, self.tries_left);
        (self, message)
    }
}
