//! A distributed tree merge sort built on point-to-point handoffs.
#![cfg_attr(feature = "strict", deny(warnings), deny(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod constants;
pub mod exchange;
pub mod merge;
pub mod tools;
pub mod topology;
pub mod transport;
pub mod treesort;
