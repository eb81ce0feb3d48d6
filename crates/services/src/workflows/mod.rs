//! Cross-entity business rules. Each workflow touches more than one
//! collection; the DAO layer below enforces no cross-field invariants.
//!
//! MongoDB gives per-document atomicity only. A crash between the two writes
//! of an accept/revert leaves partial state; the second step's failure is
//! surfaced without rolling back the first. Known limitation.

pub mod agreement;
pub mod coupon;
pub mod payment;

pub use agreement::AgreementWorkflow;
pub use coupon::{CouponDecision, CouponTerms, CouponWorkflow};
pub use payment::{NewPayment, PaymentKind, PaymentWorkflow};

use thiserror::Error;

use crate::dao::base::DaoError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Dao(#[from] DaoError),
}

impl WorkflowError {
    /// A lookup miss becomes NotFound with the given message; any other DAO
    /// failure (driver, serialization) passes through as Dao so it keeps
    /// reading as an internal error upstream.
    pub fn from_lookup(err: DaoError, message: &str) -> Self {
        match err {
            DaoError::NotFound => WorkflowError::NotFound(message.to_string()),
            other => WorkflowError::Dao(other),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
