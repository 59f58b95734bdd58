//! Sequential suite runner and its report.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::client::SutClient;

use super::check::{Category, CheckInfo, ConformanceCheck, Outcome};

/// Selects and runs checks one after another against a single SUT.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    categories: Vec<Category>,
    filter: Option<String>,
}

impl SuiteRunner {
    /// A runner that selects every check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the run to the given categories. Empty means all.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Restrict the run to checks whose name contains `filter`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn selects(&self, info: &CheckInfo) -> bool {
        let category_ok = self.categories.is_empty() || self.categories.contains(&info.category);
        let name_ok = self
            .filter
            .as_deref()
            .map(|f| info.name.contains(f))
            .unwrap_or(true);
        category_ok && name_ok
    }

    pub async fn run(
        &self,
        client: &SutClient,
        checks: &[Box<dyn ConformanceCheck>],
    ) -> SuiteReport {
        let started_at = Utc::now();
        let mut reports = Vec::new();

        for check in checks.iter().filter(|c| self.selects(c.info())) {
            let info = *check.info();
            let started = Instant::now();
            let outcome = check.run(client).await;
            let duration = started.elapsed();

            log_outcome(&info, &outcome);
            reports.push(CheckReport {
                info,
                outcome,
                duration,
            });
        }

        SuiteReport {
            sut_url: client.config().url.clone(),
            started_at,
            finished_at: Utc::now(),
            checks: reports,
        }
    }
}

fn log_outcome(info: &CheckInfo, outcome: &Outcome) {
    match outcome {
        Outcome::Passed { detail } => {
            info!(check = info.name, category = %info.category, detail = ?detail, "passed")
        }
        Outcome::Skipped { reason } => {
            info!(check = info.name, category = %info.category, reason = %reason, "skipped")
        }
        Outcome::Failed { reason } if info.category.is_optional() => {
            warn!(check = info.name, category = %info.category, reason = %reason, "optional check failed")
        }
        Outcome::Failed { reason } => {
            error!(check = info.name, category = %info.category, reason = %reason, "mandatory check failed")
        }
    }
}

/// Outcome of one check within a run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub info: CheckInfo,
    pub outcome: Outcome,
    pub duration: Duration,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub sut_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub checks: Vec<CheckReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.count(Outcome::is_passed)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    fn count(&self, pred: fn(&Outcome) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.outcome)).count()
    }

    /// Failed checks in the mandatory category.
    pub fn mandatory_failures(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks
            .iter()
            .filter(|c| c.outcome.is_failed() && !c.info.category.is_optional())
    }

    /// Failed checks in optional categories.
    pub fn optional_failures(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks
            .iter()
            .filter(|c| c.outcome.is_failed() && c.info.category.is_optional())
    }

    /// `true` when no mandatory check failed. Optional failures only limit
    /// feature completeness.
    pub fn is_compliant(&self) -> bool {
        self.mandatory_failures().next().is_none()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A2A conformance report for {}", self.sut_url)?;
        writeln!(
            f,
            "started {}, finished {}",
            self.started_at.to_rfc3339(),
            self.finished_at.to_rfc3339()
        )?;
        writeln!(f)?;

        for check in &self.checks {
            writeln!(
                f,
                "[{:<10}] {:<32} {} ({} ms)",
                check.info.category,
                check.info.name,
                check.outcome,
                check.duration.as_millis()
            )?;
            if check.outcome.is_failed() {
                writeln!(f, "             impact: {}", check.info.failure_impact)?;
                writeln!(f, "             fix:    {}", check.info.fix_suggestion)?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "{} passed, {} skipped, {} failed ({} optional)",
            self.passed(),
            self.skipped(),
            self.failed(),
            self.optional_failures().count()
        )?;
        if self.is_compliant() {
            write!(f, "SUT is compliant with the selected mandatory checks")
        } else {
            write!(f, "SUT is NOT compliant: mandatory checks failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(category: Category, outcome: Outcome) -> CheckReport {
        CheckReport {
            info: CheckInfo {
                name: "sample_check",
                category,
                description: "d",
                failure_impact: "i",
                fix_suggestion: "s",
            },
            outcome,
            duration: Duration::from_millis(3),
        }
    }

    fn suite(checks: Vec<CheckReport>) -> SuiteReport {
        SuiteReport {
            sut_url: "http://localhost:9999".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            checks,
        }
    }

    #[test]
    fn optional_failures_keep_compliance() {
        let report = suite(vec![
            report(Category::Mandatory, Outcome::pass()),
            report(Category::Feature, Outcome::fail("no support")),
            report(Category::Feature, Outcome::skip("no task")),
        ]);
        assert!(report.is_compliant());
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.optional_failures().count(), 1);
    }

    #[test]
    fn mandatory_failure_breaks_compliance() {
        let report = suite(vec![report(Category::Mandatory, Outcome::fail("boom"))]);
        assert!(!report.is_compliant());
        let text = report.to_string();
        assert!(text.contains("FAILED (boom)"));
        assert!(text.contains("impact: i"));
        assert!(text.contains("NOT compliant"));
    }

    #[test]
    fn runner_selection() {
        let info = CheckInfo {
            name: "reference_task_ids_valid",
            category: Category::Feature,
            description: "",
            failure_impact: "",
            fix_suggestion: "",
        };
        assert!(SuiteRunner::new().selects(&info));
        assert!(SuiteRunner::new()
            .with_categories([Category::Feature])
            .selects(&info));
        assert!(!SuiteRunner::new()
            .with_categories([Category::Mandatory])
            .selects(&info));
        assert!(SuiteRunner::new().with_filter("reference").selects(&info));
        assert!(!SuiteRunner::new().with_filter("streaming").selects(&info));
    }
}
