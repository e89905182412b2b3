//! Static hierarchy of test groups.
//!
//! A tree is assembled once, before any execution, from leaf suites and
//! composites. Construction validates labels; after that the tree is
//! immutable and can be shared freely between threads.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{HarnessError, Result, TreeIssue};
use crate::testing::context::CaseContext;
use crate::testing::outcome::Outcome;

/// Separator between labels in a qualified path.
pub const PATH_SEPARATOR: char = '/';

/// Callable behind a test case.
pub type Action = Arc<dyn Fn(&mut CaseContext) -> Outcome + Send + Sync>;

/// The atomic unit: a name and an action.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    action: Action,
}

impl TestCase {
    /// Case whose action takes no fixture.
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(move |_ctx: &mut CaseContext| action()),
        }
    }

    /// Case whose action uses the per-invocation context (seeded PRNG).
    pub fn seeded<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut CaseContext) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn action(&self) -> Action {
        Arc::clone(&self.action)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Named, flat, ordered group of test cases.
#[derive(Debug, Clone)]
pub struct LeafSuite {
    label: String,
    tests: Vec<TestCase>,
}

impl LeafSuite {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }
}

/// Named node grouping other suites.
#[derive(Debug, Clone)]
pub struct CompositeSuite {
    label: String,
    children: Vec<SuiteNode>,
}

/// A child of a composite suite.
#[derive(Debug, Clone)]
pub enum SuiteNode {
    Leaf(LeafSuite),
    Composite(CompositeSuite),
}

impl SuiteNode {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.label(),
            Self::Composite(composite) => composite.label(),
        }
    }
}

impl From<LeafSuite> for SuiteNode {
    fn from(leaf: LeafSuite) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<CompositeSuite> for SuiteNode {
    fn from(composite: CompositeSuite) -> Self {
        Self::Composite(composite)
    }
}

/// A test case together with its position in the tree.
#[derive(Debug, Clone)]
pub struct CaseRef<'a> {
    /// Qualified path, e.g. `unit/reed solomon/encode`.
    pub path: String,
    /// Position in traversal order.
    pub index: usize,
    pub case: &'a TestCase,
}

/// Build a leaf suite.
///
/// Empty leaves are allowed and contribute nothing to a run. An empty label,
/// an empty case name, a label containing `/` or a repeated case name is a
/// configuration error.
pub fn leaf(label: impl Into<String>, tests: Vec<TestCase>) -> Result<LeafSuite> {
    let label = label.into();
    validate_label(&label)?;

    let mut names = HashSet::new();
    for test in &tests {
        let qualified = format!("{label}{PATH_SEPARATOR}{}", test.name);
        validate_label(&test.name).map_err(|_| {
            let issue = if test.name.trim().is_empty() {
                TreeIssue::EmptyLabel
            } else {
                TreeIssue::SeparatorInLabel
            };
            HarnessError::configuration(qualified.clone(), issue)
        })?;
        if !names.insert(test.name.as_str()) {
            return Err(HarnessError::configuration(qualified, TreeIssue::DuplicateCase));
        }
    }

    Ok(LeafSuite { label, tests })
}

/// Build a composite suite from an ordered list of children.
pub fn compose(label: impl Into<String>, children: Vec<SuiteNode>) -> Result<CompositeSuite> {
    let label = label.into();
    validate_label(&label)?;

    let mut seen = HashSet::new();
    for child in &children {
        if !seen.insert(child.label()) {
            return Err(HarnessError::configuration(
                format!("{label}{PATH_SEPARATOR}{}", child.label()),
                TreeIssue::DuplicateSibling,
            ));
        }
    }

    Ok(CompositeSuite { label, children })
}

fn validate_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(HarnessError::configuration(label, TreeIssue::EmptyLabel));
    }
    if label.contains(PATH_SEPARATOR) {
        return Err(HarnessError::configuration(label, TreeIssue::SeparatorInLabel));
    }
    Ok(())
}

impl CompositeSuite {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn children(&self) -> &[SuiteNode] {
        &self.children
    }

    /// Every test case in depth-first, pre-order, registration order.
    #[must_use]
    pub fn cases(&self) -> Vec<CaseRef<'_>> {
        let mut out = Vec::new();
        let mut prefix = vec![self.label.as_str()];
        let separator = PATH_SEPARATOR.to_string();
        collect_composite(self, &separator, &mut prefix, &mut out);
        out
    }

    /// Number of test cases in the whole tree.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                SuiteNode::Leaf(leaf) => leaf.tests.len(),
                SuiteNode::Composite(composite) => composite.case_count(),
            })
            .sum()
    }
}

fn collect_composite<'a>(
    composite: &'a CompositeSuite,
    separator: &str,
    prefix: &mut Vec<&'a str>,
    out: &mut Vec<CaseRef<'a>>,
) {
    for child in &composite.children {
        match child {
            SuiteNode::Leaf(leaf) => {
                prefix.push(&leaf.label);
                for case in &leaf.tests {
                    prefix.push(&case.name);
                    out.push(CaseRef {
                        path: prefix.join(separator),
                        index: out.len(),
                        case,
                    });
                    prefix.pop();
                }
                prefix.pop();
            }
            SuiteNode::Composite(nested) => {
                prefix.push(&nested.label);
                collect_composite(nested, separator, prefix, out);
                prefix.pop();
            }
        }
    }
}
