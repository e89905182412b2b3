//! Property tests entry point.

mod runner_props;
mod selection_props;
