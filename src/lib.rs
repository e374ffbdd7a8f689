pub mod card;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipelines;
pub mod publish;
pub mod shard;
pub mod sources;
pub mod transcripts;
