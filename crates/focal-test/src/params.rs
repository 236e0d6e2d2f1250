//! Regression test parameters and operations

use focal_core::Raster;
use std::fmt::Display;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results (default)
    #[default]
    Compare,
    /// Compare and print rasters passed to `show`
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode, and every
/// recorded failure.
pub struct RegParams {
    /// Name of the test (e.g., "link")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is read from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Compare two rasters sample by sample
    ///
    /// Returns `true` if the shapes agree and every pair of samples differs
    /// by at most `delta`.
    pub fn compare_rasters<T>(
        &mut self,
        expected: &Raster<T>,
        actual: &Raster<T>,
        delta: f64,
    ) -> bool
    where
        T: Copy + Into<f64>,
    {
        self.index += 1;

        if expected.shape() != actual.shape() {
            let msg = format!(
                "Failure in {}_reg: raster comparison for index {} - shape {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.shape(),
                actual.shape()
            );
            self.fail(msg);
            return false;
        }

        let cols = expected.cols();
        for (i, (&e, &a)) in expected.data().iter().zip(actual.data()).enumerate() {
            let (e, a): (f64, f64) = (e.into(), a.into());
            let diff = (e - a).abs();
            if diff > delta || diff.is_nan() {
                let msg = format!(
                    "Failure in {}_reg: raster comparison for index {} - \
                     sample mismatch at ({}, {}): expected {}, actual {}",
                    self.test_name,
                    self.index,
                    i / cols,
                    i % cols,
                    e,
                    a
                );
                self.fail(msg);
                return false;
            }
        }

        true
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            let msg = format!(
                "Failure in {}_reg: check {} failed: {}",
                self.test_name, self.index, what
            );
            self.fail(msg);
        }
        condition
    }

    /// Print a raster in display mode
    pub fn show<T: Copy + Display>(&self, label: &str, raster: &Raster<T>) {
        if !self.display() {
            return;
        }
        eprintln!("{} [{}x{}]", label, raster.rows(), raster.cols());
        for r in 0..raster.rows() {
            let line: Vec<String> = raster.row(r).iter().map(|v| format!("{v:>7.2}")).collect();
            eprintln!("  {}", line.join(" "));
        }
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }
}
