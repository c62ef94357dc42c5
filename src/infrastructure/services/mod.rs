//! Application services

mod synthesis_service;

pub use synthesis_service::{
    StatsReport, SynthesisFailure, SynthesisResult, SynthesisService, SynthesisTimeouts,
};
