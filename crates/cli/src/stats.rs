//! The statistics `ct` computes.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Sum,
    Mean,
    Max,
}

impl Statistic {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Max => "max",
        }
    }

    /// Whether the statistic is defined for an empty list of numbers.
    #[must_use]
    pub fn allows_empty(self) -> bool {
        matches!(self, Statistic::Sum)
    }

    /// Computes the statistic, `None` when it is undefined for `numbers`.
    #[must_use]
    pub fn compute(self, numbers: &[f64]) -> Option<f64> {
        debug!("Computing {} of {} number(s)", self.name(), numbers.len());
        match self {
            Statistic::Sum => Some(numbers.iter().sum()),
            Statistic::Mean if numbers.is_empty() => None,
            #[allow(clippy::cast_precision_loss)]
            Statistic::Mean => Some(numbers.iter().sum::<f64>() / numbers.len() as f64),
            Statistic::Max => numbers.iter().copied().reduce(f64::max),
        }
    }
}

impl Display for Statistic {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

/// A statistic to compute and how to print it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub statistic: Statistic,
    pub numbers: Vec<f64>,
    pub precision: usize,
    pub verbose: bool,
}

impl Job {
    /// The line `ct` prints for the job.
    #[must_use]
    pub fn report(&self) -> String {
        let value = self.statistic.compute(&self.numbers).unwrap_or(f64::NAN);
        let formatted = format!("{value:.precision$}", precision = self.precision);
        if self.verbose {
            format!(
                "{} of {}: {formatted}",
                self.statistic,
                self.numbers.iter().map(ToString::to_string).join(", ")
            )
        } else {
            formatted
        }
    }
}
