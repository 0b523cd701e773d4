mod bucketing;
mod calendar;
mod canonical;
mod collector;
mod config;
mod error;
mod processor;
mod statistics;
pub mod types;

pub use {
    bucketing::recent_window,
    calendar::Calendar,
    canonical::{CanonicalRecord, Canonicalizer},
    collector::{Collector, write_chart},
    config::{AggregationConfig, Config, ConfigError},
    error::{ChartError, Result},
    processor::{ChartSource, DaySummary, Processor},
    statistics::{AggregateRecord, aggregate, median},
};
