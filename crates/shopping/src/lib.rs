pub mod aggregation;
mod command;
mod query;

pub use aggregation::{
    Aggregator, ItemKey, KeyPolicy, aggregate, aggregate_with, merge, merge_with,
};
pub use command::*;
pub use query::*;
