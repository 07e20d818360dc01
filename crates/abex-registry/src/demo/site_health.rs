//! # Site Health Demo
//!
//! Read-only ability that runs a set of [`HealthCheck`]s and reports an
//! overall status, a 0-100 score and the critical findings.
//!
//! Status is `critical` if any check is critical, else `recommended` if any
//! check is recommended, else `good`. The score is the share of `good`
//! checks, rounded, and `0` when no checks are configured.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use abex_core::{AbilityName, NameError};

use crate::ability::{AbilityFailure, Invocable};

/// Outcome class of one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Recommended,
    Critical,
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// Stable identifier of the check.
    pub test: String,
    pub label: String,
    pub status: HealthStatus,
    pub description: String,
}

impl CheckResult {
    pub fn new(
        test: impl Into<String>,
        status: HealthStatus,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            label: label.into(),
            status,
            description: description.into(),
        }
    }
}

/// A single diagnostic probe.
pub trait HealthCheck: Send + Sync {
    fn run(&self) -> CheckResult;
}

/// Checks that the temporary directory accepts new files.
#[derive(Debug, Default)]
pub struct TempDirWritable;

impl HealthCheck for TempDirWritable {
    fn run(&self) -> CheckResult {
        match tempfile::NamedTempFile::new() {
            Ok(_) => CheckResult::new(
                "temp_dir_writable",
                HealthStatus::Good,
                "Temporary directory is writable",
                "Scratch files can be created in the system temporary directory.",
            ),
            Err(err) => CheckResult::new(
                "temp_dir_writable",
                HealthStatus::Critical,
                "Temporary directory is not writable",
                format!("Creating a scratch file failed: {err}"),
            ),
        }
    }
}

/// Checks that more than one CPU is available to the process.
#[derive(Debug, Default)]
pub struct AvailableParallelism;

impl HealthCheck for AvailableParallelism {
    fn run(&self) -> CheckResult {
        match std::thread::available_parallelism() {
            Ok(n) if n.get() > 1 => CheckResult::new(
                "available_parallelism",
                HealthStatus::Good,
                "Multiple CPUs available",
                format!("{n} CPUs are available to the process."),
            ),
            Ok(_) => CheckResult::new(
                "available_parallelism",
                HealthStatus::Recommended,
                "Single CPU available",
                "Only one CPU is available; concurrent requests will queue.",
            ),
            Err(err) => CheckResult::new(
                "available_parallelism",
                HealthStatus::Recommended,
                "CPU count unknown",
                format!("The number of available CPUs could not be determined: {err}"),
            ),
        }
    }
}

/// Checks run by the demo when none are injected.
pub fn default_checks() -> Vec<Arc<dyn HealthCheck>> {
    vec![Arc::new(TempDirWritable), Arc::new(AvailableParallelism)]
}

/// The `get-site-health` demo ability.
pub struct SiteHealthAbility {
    name: AbilityName,
    input_schema: Value,
    output_schema: Value,
    meta: Value,
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl SiteHealthAbility {
    pub const LABEL: &'static str = "Get Site Health Status";
    pub const DESCRIPTION: &'static str = "Returns site health status from a set of built-in \
        diagnostic checks. Shows overall status, test results, and critical issues.";

    pub fn new(name: &str, checks: Vec<Arc<dyn HealthCheck>>) -> Result<Self, NameError> {
        Ok(Self {
            name: AbilityName::new(name)?,
            input_schema: json!({
                "type": "object",
                "properties": {
                    "include_details": {
                        "type": "boolean",
                        "description": "Include detailed test results",
                        "default": false
                    }
                }
            }),
            output_schema: json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "description": "Overall site health status (good, recommended, critical)"
                    },
                    "score": {"type": "number", "description": "Site health score (0-100)"},
                    "counts": {
                        "type": "object",
                        "description": "Counts of tests by status",
                        "properties": {
                            "good": {"type": "integer"},
                            "recommended": {"type": "integer"},
                            "critical": {"type": "integer"}
                        }
                    },
                    "critical_issues": {"type": "array", "description": "List of critical issues"}
                }
            }),
            meta: json!({"category": "diagnostics", "annotations": {"readonly": true}}),
            checks,
        })
    }

    /// Run every check and build the report.
    pub fn report(&self, include_details: bool) -> Value {
        let results: Vec<CheckResult> = self.checks.iter().map(|check| check.run()).collect();
        let count = |status: HealthStatus| results.iter().filter(|r| r.status == status).count();
        let good = count(HealthStatus::Good);
        let recommended = count(HealthStatus::Recommended);
        let critical = count(HealthStatus::Critical);
        let total = results.len();

        let score = if total > 0 {
            ((good as f64 / total as f64) * 100.0).round() as u64
        } else {
            0
        };
        let status = if critical > 0 {
            HealthStatus::Critical
        } else if recommended > 0 {
            HealthStatus::Recommended
        } else {
            HealthStatus::Good
        };
        let critical_issues: Vec<Value> = results
            .iter()
            .filter(|r| r.status == HealthStatus::Critical)
            .map(|r| json!({"label": r.label, "description": r.description}))
            .collect();

        let mut report = json!({
            "status": status,
            "score": score,
            "counts": {"good": good, "recommended": recommended, "critical": critical},
            "critical_issues": critical_issues,
        });
        if include_details {
            report["tests"] = json!(results);
        }
        report
    }
}

impl Invocable for SiteHealthAbility {
    fn name(&self) -> &AbilityName {
        &self.name
    }

    fn label(&self) -> &str {
        Self::LABEL
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    fn output_schema(&self) -> &Value {
        &self.output_schema
    }

    fn meta(&self) -> &Value {
        &self.meta
    }

    fn execute(&self, input: Option<Value>) -> Result<Value, AbilityFailure> {
        let include_details = input
            .as_ref()
            .and_then(|i| i.get("include_details"))
            .is_some_and(is_truthy);
        Ok(self.report(include_details))
    }
}

/// Loose boolean reading of a form value: `false`, `0`, `""`, `"0"`, `null`
/// and empty arrays are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
