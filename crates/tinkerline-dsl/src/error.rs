use thiserror::Error;

/// Errors recorded while building a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct BuildError {
    messages: Vec<String>,
}

impl BuildError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
