//! Validation engine for ranking configurations.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`TextRankConfig`] and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so users
//! see all problems at once.
//!
//! # Quick start
//!
//! ```rust
//! use hatetracker::pipeline::validation::ValidationEngine;
//! use hatetracker::TextRankConfig;
//!
//! let cfg = TextRankConfig::default().with_window_size(0);
//! let report = ValidationEngine::with_defaults().validate(&cfg);
//! assert!(report.has_errors());
//! ```

use std::fmt;

use serde::Serialize;

use crate::types::TextRankConfig;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Issue ──────────────────────────────────────────────────────────────────

/// Stable machine-readable category of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    OutOfRange,
    NotFinite,
    Suspicious,
}

/// A single problem found in a configuration, addressed by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigIssue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A validation finding: an issue tagged with its severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub issue: ConfigIssue,
}

impl ValidationDiagnostic {
    pub fn error(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Error,
            issue,
        }
    }

    pub fn warning(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Warning,
            issue,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity issues.
    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.issue)
    }

    /// Iterate over warning-severity issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.issue)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    /// Errors only, joined by `; `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.errors().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`TextRankConfig`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so one engine can be shared
/// across threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"damping"`).
    fn name(&self) -> &str;

    /// Inspect `cfg` and return any findings.
    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`TextRankConfig`] and collects
/// all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(WindowRule));
        engine.add_rule(Box::new(DampingRule));
        engine.add_rule(Box::new(ConvergenceRule));
        engine.add_rule(Box::new(SelectionRule));
        engine.add_rule(Box::new(PhraseLimitRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in execution order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `cfg` and return the collected report.
    pub fn validate(&self, cfg: &TextRankConfig) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(cfg));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

/// Windows wider than this link almost every token pair in short documents.
const WIDE_WINDOW: usize = 10;

/// Tolerances looser than this stop the ranker before scores settle.
const LOOSE_TOLERANCE: f64 = 1e-2;

// ─── 1. window size ─────────────────────────────────────────────────────────

struct WindowRule;

impl ValidationRule for WindowRule {
    fn name(&self) -> &str {
        "window"
    }

    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic> {
        if cfg.window_size == 0 {
            vec![ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::OutOfRange,
                    "/window_size",
                    "window_size must be at least 1",
                )
                .with_hint("Use 2 to link adjacent and next-but-one tokens"),
            )]
        } else if cfg.window_size > WIDE_WINDOW {
            vec![ValidationDiagnostic::warning(ConfigIssue::new(
                IssueCode::Suspicious,
                "/window_size",
                format!(
                    "window_size {} is unusually wide; rankings flatten towards term frequency",
                    cfg.window_size
                ),
            ))]
        } else {
            vec![]
        }
    }
}

// ─── 2. damping factor in the open interval (0, 1) ──────────────────────────

struct DampingRule;

impl ValidationRule for DampingRule {
    fn name(&self) -> &str {
        "damping"
    }

    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic> {
        if !cfg.damping.is_finite() {
            return vec![ValidationDiagnostic::error(ConfigIssue::new(
                IssueCode::NotFinite,
                "/damping",
                "damping must be a finite number",
            ))];
        }

        if cfg.damping <= 0.0 || cfg.damping >= 1.0 {
            vec![ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::OutOfRange,
                    "/damping",
                    format!("damping must lie strictly between 0 and 1, got {}", cfg.damping),
                )
                .with_hint("The usual value is 0.85"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 3. convergence tolerance and iteration cap ─────────────────────────────

struct ConvergenceRule;

impl ValidationRule for ConvergenceRule {
    fn name(&self) -> &str {
        "convergence"
    }

    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let tolerance = cfg.convergence_threshold;
        if !tolerance.is_finite() {
            out.push(ValidationDiagnostic::error(ConfigIssue::new(
                IssueCode::NotFinite,
                "/convergence_threshold",
                "convergence_threshold must be a finite number",
            )));
        } else if tolerance < 0.0 {
            out.push(ValidationDiagnostic::error(ConfigIssue::new(
                IssueCode::OutOfRange,
                "/convergence_threshold",
                format!("convergence_threshold must not be negative, got {tolerance}"),
            )));
        } else if tolerance > LOOSE_TOLERANCE {
            out.push(ValidationDiagnostic::warning(ConfigIssue::new(
                IssueCode::Suspicious,
                "/convergence_threshold",
                format!(
                    "convergence_threshold {tolerance} is loose; scores may be far from stable"
                ),
            )));
        }

        if cfg.max_iterations == 0 {
            out.push(ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::OutOfRange,
                    "/max_iterations",
                    "max_iterations must be at least 1",
                )
                .with_hint("The usual value is 100"),
            ));
        }

        out
    }
}

// ─── 4. keyword selection: threshold or top fraction ────────────────────────

struct SelectionRule;

impl ValidationRule for SelectionRule {
    fn name(&self) -> &str {
        "selection"
    }

    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic> {
        if let Some(threshold) = cfg.score_threshold {
            if threshold.is_finite() {
                return vec![];
            }
            return vec![ValidationDiagnostic::error(ConfigIssue::new(
                IssueCode::NotFinite,
                "/score_threshold",
                "score_threshold must be a finite number",
            ))];
        }

        let fraction = cfg.top_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            vec![ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::OutOfRange,
                    "/top_fraction",
                    format!("top_fraction must lie in (0, 1], got {fraction}"),
                )
                .with_hint("Set score_threshold instead to select by absolute score"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 5. phrase limit must be positive when set ──────────────────────────────

struct PhraseLimitRule;

impl ValidationRule for PhraseLimitRule {
    fn name(&self) -> &str {
        "phrase_limit"
    }

    fn validate(&self, cfg: &TextRankConfig) -> Vec<ValidationDiagnostic> {
        if cfg.phrase_limit == Some(0) {
            vec![ValidationDiagnostic::error(
                ConfigIssue::new(
                    IssueCode::OutOfRange,
                    "/phrase_limit",
                    "phrase_limit must be greater than 0",
                )
                .with_hint("Remove phrase_limit to keep every phrase"),
            )]
        } else {
            vec![]
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
