//! Signal extraction: mechanical marker search, no verdicts.

pub mod extractor;

pub use extractor::{SignalExtractor, SignalMatch, StageSignals};
