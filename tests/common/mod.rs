#![allow(dead_code)]

pub mod probes;
pub mod strategies;
pub mod tasks;

pub use probes::*;
pub use tasks::*;
