use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to build substitution automaton: {0}")]
    Automaton(#[source] aho_corasick::BuildError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
