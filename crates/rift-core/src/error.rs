use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating entities and geometry.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity handle does not resolve to a live entity. Either it was
    /// never spawned in this registry or it has already been relocated to
    /// the dead set.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A shape was constructed with degenerate dimensions.
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}
