//! Conformance checks and the runner that executes them.
//!
//! Checks follow one policy for skip versus fail:
//! - a prerequisite step that cannot be completed (transport failure, or a
//!   setup request that did not succeed) skips the check
//! - a malformed response, or a transport failure in the step under test,
//!   fails it
//!
//! Failures in optional categories are reported but do not make the SUT
//! non-compliant.

mod check;
mod message_send;
mod reference_task_ids;
mod runner;

pub use check::{Category, CheckInfo, ConformanceCheck, Outcome};
pub use message_send::MessageSendText;
pub use reference_task_ids::{ReferenceTaskIdsInvalid, ReferenceTaskIdsValid, NONEXISTENT_TASK_ID};
pub use runner::{CheckReport, SuiteReport, SuiteRunner};

/// Every check the kit ships, mandatory checks first.
pub fn default_checks() -> Vec<Box<dyn ConformanceCheck>> {
    vec![
        Box::new(MessageSendText),
        Box::new(ReferenceTaskIdsValid),
        Box::new(ReferenceTaskIdsInvalid),
    ]
}
