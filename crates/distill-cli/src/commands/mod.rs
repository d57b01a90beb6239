//! Command implementations.

pub mod batch;
pub mod compare;
pub mod compress;
pub mod config;
pub mod contradictions;
pub mod summary;
pub mod trace;

pub use self::batch::execute_batch;
pub use self::compare::execute_compare;
pub use self::compress::execute_compress;
pub use self::config::execute_config;
pub use self::contradictions::execute_contradictions;
pub use self::summary::execute_summary;
pub use self::trace::execute_trace;

use crate::cli::EngineArgs;
use crate::error::Result;
use distill_extractor::{Engine, EngineConfig};

/// Build an engine from the configured settings plus command-line overrides.
pub(crate) fn build_engine(base: &EngineConfig, args: &EngineArgs) -> Result<Engine> {
    let mut config = base.clone();
    if let Some(strategy) = args.strategy {
        config.chunk_strategy = strategy.into();
    }
    if let Some(size) = args.max_chunk_size {
        config.max_chunk_size = size;
    }
    Ok(Engine::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StrategyArg;
    use distill_extractor::ChunkStrategy;

    #[test]
    fn test_overrides_apply() {
        let args = EngineArgs {
            strategy: Some(StrategyArg::Sentence),
            max_chunk_size: Some(200),
        };
        let engine = build_engine(&EngineConfig::default(), &args).unwrap();
        assert_eq!(engine.config().chunk_strategy, ChunkStrategy::Sentence);
        assert_eq!(engine.config().max_chunk_size, 200);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = EngineArgs {
            strategy: None,
            max_chunk_size: Some(0),
        };
        assert!(build_engine(&EngineConfig::default(), &args).is_err());
    }
}
