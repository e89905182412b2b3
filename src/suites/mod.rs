//! Leaf suites for each tested subsystem and the root tree that holds them.


use tracing::debug;

use crate::error::Result;
use crate::hqc::Variant;
use crate::testing::{CompositeSuite, compose, leaf};

/// Label of the root suite.
pub const ROOT_LABEL: &str = "unit";

pub const GALOIS_FIELD: &str = "galois field";
pub const REED_SOLOMON: &str = "reed solomon";
pub const VECTOR: &str = "vector";

/// Assemble `unit{galois field, reed solomon, vector}` for `variant`.
pub fn build_tree(variant: Variant) -> Result<CompositeSuite> {
    let tree = compose(
        ROOT_LABEL,
        vec![
            leaf(GALOIS_FIELD, gf_tests::tests())?.into(),
            leaf(REED_SOLOMON, rs_tests::tests(variant))?.into(),
            leaf(VECTOR, vector_tests::tests(variant))?.into(),
        ],
    )?;
    debug!(%variant, cases = tree.case_count(), "assembled suite tree");
    Ok(tree)
}
