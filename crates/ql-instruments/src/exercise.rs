//! Option exercise types.
//!
//! An `Exercise` defines *when* an option can be exercised, as times in
//! years from the valuation date.

use ql_core::{Result, Time};
use std::fmt;

/// Type of exercise right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseType {
    /// Can only be exercised at expiry.
    European,
    /// Can be exercised at any time up to expiry.
    American,
    /// Can be exercised at specific times.
    Bermudan,
}

/// Exercise specification for an option.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    exercise_type: ExerciseType,
    /// The exercise time(s), never empty.
    ///
    /// - European: single time (the expiry).
    /// - American: two times (earliest, latest).
    /// - Bermudan: multiple sorted times.
    times: Vec<Time>,
}

impl Exercise {
    /// Create a European exercise (single expiry time).
    pub fn european(expiry: Time) -> Self {
        Self {
            exercise_type: ExerciseType::European,
            times: vec![expiry],
        }
    }

    /// Create an American exercise (earliest to latest).
    ///
    /// # Errors
    /// `earliest` must not be after `latest`.
    pub fn american(earliest: Time, latest: Time) -> Result<Self> {
        ql_core::ensure!(
            earliest <= latest,
            "earliest exercise ({earliest}) is later than latest ({latest})"
        );
        Ok(Self {
            exercise_type: ExerciseType::American,
            times: vec![earliest, latest],
        })
    }

    /// Create a Bermudan exercise from a set of exercise times.
    ///
    /// Times are sorted and duplicates removed.
    ///
    /// # Errors
    /// At least one finite time is required.
    pub fn bermudan(mut times: Vec<Time>) -> Result<Self> {
        ql_core::ensure!(!times.is_empty(), "no exercise times given");
        ql_core::ensure!(
            times.iter().all(|t| t.is_finite()),
            "exercise times must be finite"
        );
        times.sort_by(|a, b| a.total_cmp(b));
        times.dedup();
        Ok(Self {
            exercise_type: ExerciseType::Bermudan,
            times,
        })
    }

    /// The last possible exercise time.
    pub fn last_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All exercise times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// The type of exercise.
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exercise_type {
            ExerciseType::European => write!(f, "European({})", self.times[0]),
            ExerciseType::American => {
                write!(f, "American({} to {})", self.times[0], self.last_time())
            }
            ExerciseType::Bermudan => {
                write!(f, "Bermudan({} times)", self.times.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn european_exercise() {
        let ex = Exercise::european(1.5);
        assert_eq!(ex.exercise_type(), ExerciseType::European);
        assert_eq!(ex.last_time(), 1.5);
        assert_eq!(ex.times().len(), 1);
    }

    #[test]
    fn american_exercise() {
        let ex = Exercise::american(0.0, 2.0).unwrap();
        assert_eq!(ex.exercise_type(), ExerciseType::American);
        assert_eq!(ex.last_time(), 2.0);
        assert_eq!(ex.to_string(), "American(0 to 2)");
        assert!(Exercise::american(2.0, 1.0).is_err());
    }

    #[test]
    fn bermudan_exercise() {
        let ex = Exercise::bermudan(vec![1.0, 0.5, 1.0, 0.25]).unwrap();
        assert_eq!(ex.exercise_type(), ExerciseType::Bermudan);
        assert_eq!(ex.times(), &[0.25, 0.5, 1.0]);
        assert_eq!(ex.last_time(), 1.0);
        assert!(Exercise::bermudan(vec![]).is_err());
    }
}
