//! Unit test suite entry point.

mod config_tests;
mod runner_tests;
mod suite_tree_tests;
