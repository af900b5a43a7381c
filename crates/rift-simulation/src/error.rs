use rift_core::{CoreError, EntityId};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up or driving a simulation.
///
/// A tick itself never fails; these cover configuration and the
/// registry operations exposed through the world.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An entity operation was rejected by the registry.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The entity has no lives slot, so it cannot be killed.
    #[error("entity {0} does not live and cannot be killed")]
    NotMortal(EntityId),

    /// The configuration cannot drive a simulation.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}
