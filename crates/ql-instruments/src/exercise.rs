//! Option exercise styles.
//!
//! An [`Exercise`] defines *when* an option can be exercised.  The lattice
//! only looks at the [`ExerciseType`] tag: European contracts take the
//! continuation value at every interior node, American contracts compare it
//! with immediate exercise.

use ql_core::errors::{Error, Result};
use ql_core::require;
use ql_time::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of exercise right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    /// Can only be exercised at expiry.
    European,
    /// Can be exercised at any time up to expiry.
    American,
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::European => write!(f, "European"),
            ExerciseType::American => write!(f, "American"),
        }
    }
}

/// Exercise rights of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exercise {
    /// Exercisable on the expiry date only.
    European {
        /// Expiry date.
        expiry: Date,
    },
    /// Exercisable on any date in `[earliest, latest]`.
    American {
        /// First exercise date.
        earliest: Date,
        /// Last exercise date (expiry).
        latest: Date,
    },
}

impl Exercise {
    /// Create a European exercise (single expiry date).
    pub fn european(expiry: Date) -> Self {
        Exercise::European { expiry }
    }

    /// Create an American exercise window.
    ///
    /// Fails if `earliest` is after `latest`.
    pub fn american(earliest: Date, latest: Date) -> Result<Self> {
        require!(
            earliest <= latest,
            Error::invalid_contract(
                "exercise",
                format!("earliest exercise date {earliest} is after expiry {latest}")
            )
        );
        Ok(Exercise::American { earliest, latest })
    }

    /// The last possible exercise date.
    pub fn last_date(&self) -> Date {
        match *self {
            Exercise::European { expiry } => expiry,
            Exercise::American { latest, .. } => latest,
        }
    }

    /// The first possible exercise date.
    pub fn earliest_date(&self) -> Date {
        match *self {
            Exercise::European { expiry } => expiry,
            Exercise::American { earliest, .. } => earliest,
        }
    }

    /// The type of exercise.
    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            Exercise::European { .. } => ExerciseType::European,
            Exercise::American { .. } => ExerciseType::American,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exercise::European { expiry } => write!(f, "European({expiry})"),
            Exercise::American { earliest, latest } => {
                write!(f, "American({earliest} – {latest})")
            }
        }
    }
}
