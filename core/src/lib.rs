//! Refinery split calculator.
//!
//! The engine (`conversion`, `allocation`, `duration`) is a set of pure
//! functions over scalars. `calculator` composes them into the spice,
//! stravidium and plastanium pipelines. `manager` tracks group runs on top
//! of a `store::RunRepository` and hands their totals to the calculator.

pub mod allocation;
pub mod auth;
pub mod calculator;
pub mod clock;
pub mod command;
pub mod config;
pub mod conversion;
pub mod duration;
pub mod error;
pub mod event;
pub mod manager;
pub mod report;
pub mod rng;
pub mod run;
pub mod store;
pub mod types;
