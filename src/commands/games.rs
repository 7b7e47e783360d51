use async_trait::async_trait;

use super::{Command, CommandContext, CommandOutput};
use crate::games::GAMES_HELP;

/// `games [help | tictactoe | guess [n] | move <n> | exit]`
pub struct GamesCommand;

#[async_trait]
impl Command for GamesCommand {
    fn name(&self) -> &str {
        "games"
    }

    async fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        let Some(sub) = args.first() else {
            return GAMES_HELP.into();
        };
        let rest = args.get(1).map(String::as_str);
        let games = &mut *ctx.games;

        let message = match (sub.to_lowercase().as_str(), rest) {
            ("help", _) => GAMES_HELP.to_string(),
            ("move", position) => games.play_move(position),
            ("guess", Some(number)) => games.guess(number),
            ("exit", _) => games.exit(),
            (game, _) => games.start(game),
        };
        message.into()
    }
}
