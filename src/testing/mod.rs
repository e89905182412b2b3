//! Suite composition and execution.
//!
//! Provides the suite tree ([`CompositeSuite`], [`LeafSuite`], [`TestCase`]),
//! selection of qualified test paths, the sequential [`SuiteRunner`] and the
//! [`RunReport`] it produces, plus the diagnostics banner printed before a run.

mod assert;
pub mod context;
pub mod diagnostics;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod selection;
pub mod suite;

pub use context::CaseContext;
pub use diagnostics::{BuildMetadata, DiagnosticsReporter};
pub use outcome::{Outcome, OutcomeKind};
pub use report::{ExitStatus, OutcomeCounts, ReportEntry, RunReport};
pub use runner::{NoopObserver, RunObserver, RunOptions, RunPlan, SuiteRunner};
pub use selection::Selection;
pub use suite::{CaseRef, CompositeSuite, LeafSuite, SuiteNode, TestCase, compose, leaf};
