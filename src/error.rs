use thiserror::Error;

/// Coarse classification used by the route layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Phase,
    Target,
    State,
}

/// Every failure a game operation can report. All variants are recoverable:
/// the game state is left untouched and the message is relayed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("There is no game in this chat.")]
    GameNotFound,
    #[error("A game is already running in this chat.")]
    GameExists,
    #[error("The game has already started.")]
    AlreadyStarted,
    #[error("You are already in the game.")]
    AlreadyJoined,
    #[error("You are not in this game.")]
    NotInGame,
    #[error("At least {0} players are needed.")]
    NotEnoughPlayers(usize),
    #[error("Only the game creator can start the game.")]
    NotCreator,
    #[error("The dead cannot act.")]
    Dead,
    #[error("You are not the {0}.")]
    WrongRole(&'static str),
    #[error("That action is not available right now.")]
    WrongPhase,
    #[error("You have already acted tonight.")]
    AlreadyActed,
    #[error("Cupid only acts on the first night.")]
    CupidExpired,
    #[error("You cannot protect the same player two nights in a row.")]
    RepeatProtect,
    #[error("That potion has already been used.")]
    PotionSpent,
    #[error("The wolves have not chosen a victim yet.")]
    WolvesUndecided,
    #[error("The Hunter only shoots when eliminated.")]
    NoPendingShot,
    #[error("The village is waiting for the Hunter's shot.")]
    AwaitingHunter,
    #[error("You cannot vote for yourself.")]
    SelfVote,
    #[error("Invalid target.")]
    InvalidTarget,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotCreator
            | GameError::Dead
            | GameError::WrongRole(_)
            | GameError::NoPendingShot => ErrorKind::Authorization,
            GameError::WrongPhase
            | GameError::AlreadyActed
            | GameError::CupidExpired
            | GameError::WolvesUndecided
            | GameError::AwaitingHunter
            | GameError::AlreadyStarted => ErrorKind::Phase,
            GameError::RepeatProtect
            | GameError::PotionSpent
            | GameError::SelfVote
            | GameError::InvalidTarget => ErrorKind::Target,
            GameError::GameNotFound
            | GameError::GameExists
            | GameError::AlreadyJoined
            | GameError::NotInGame
            | GameError::NotEnoughPlayers(_) => ErrorKind::State,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(GameError::NotCreator.kind(), ErrorKind::Authorization);
        assert_eq!(GameError::WrongPhase.kind(), ErrorKind::Phase);
        assert_eq!(GameError::RepeatProtect.kind(), ErrorKind::Target);
        assert_eq!(GameError::GameNotFound.kind(), ErrorKind::State);
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            GameError::NotEnoughPlayers(6).to_string(),
            "At least 6 players are needed."
        );
    }
}
