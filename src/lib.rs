pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod executor;
pub mod main_lib;
pub mod screenshot;
pub mod seed;
pub mod snapshot;
pub mod test_runner;
pub mod tree;
pub mod ui;
