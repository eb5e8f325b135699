use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid seed '{0}': expected a decimal or 0x-prefixed 16-bit value, or 'random'")]
    InvalidSeed(String),
    #[error("seed must be non-zero")]
    ZeroSeed,
    #[error("invalid backtrack policy '{0}': must be 'trackback', 'random', or 'restart'")]
    InvalidPolicy(String),
}

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
