// src/lib.rs
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod generator;
pub mod producer;
pub mod service;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use engine::BruteForceService;
pub use filter::DedupFilter;
pub use generator::{Admission, CandidateGenerator, Target};
pub use service::{Service, ServiceState};
pub use types::{Config, Request, RequestTag, SubbruteError};
