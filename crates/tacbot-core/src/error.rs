use thiserror::Error;

/// Unexpected faults raised while evaluating a bot.
///
/// Expected negative outcomes (no enemy in sight, line of sight blocked, weapon not ready) are
/// never errors; they are `Failure` results of the node that observed them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BotError {
    #[error("actor {0} is not present in the world")]
    MissingActor(u64),

    #[error("invalid bot configuration: {0}")]
    InvalidConfig(String),

    #[error("collaborator fault in {collaborator}: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BotError>;
