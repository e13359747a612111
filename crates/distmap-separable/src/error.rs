use distmap_core::GridError;

/// Errors returned by the separable transform.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SeparableError {
    #[error(transparent)]
    Grid(#[from] GridError),
}
