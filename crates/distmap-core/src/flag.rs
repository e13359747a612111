/// A string option that does not name any known mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid flag: {0:?}")]
pub struct InvalidFlag(pub String);

impl InvalidFlag {
    pub fn new(flag: impl Into<String>) -> Self {
        Self(flag.into())
    }

    pub fn flag(&self) -> &str {
        &self.0
    }
}
