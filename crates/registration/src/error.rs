use storage::{MAX_CODENAME_LEN, StorageError};
use thiserror::Error;

/// Why a registration step did not advance.
///
/// The `Display` text is what the operator sees in the popup.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Player ID must be an integer.")]
    InvalidPlayerId,
    #[error("Player ID must be between 1 and {}.", i32::MAX)]
    PlayerIdOutOfRange,
    #[error("Equipment ID must be an integer.")]
    InvalidEquipmentId,
    #[error("Equipment ID must be at most {}.", u32::MAX)]
    EquipmentIdOutOfRange,
    #[error("Codename cannot be empty.")]
    EmptyCodename,
    #[error("Codename must be at most {} characters.", MAX_CODENAME_LEN)]
    CodenameTooLong,
    #[error("Team must be 'green' or 'red'.")]
    InvalidTeam,
    #[error("Database connection error.")]
    Storage(#[from] StorageError),
}
