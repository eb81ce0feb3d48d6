use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use homehaven_db::models::{Coupon, CouponStatus};

use crate::dao::{coupon::CouponDao, payment::PaymentDao};

use super::{WorkflowError, WorkflowResult};

/// Discount terms returned by a successful dry-run application. Nothing is
/// persisted; consumption happens when the payment referencing the code is
/// recorded.
#[derive(Debug, Clone, Serialize)]
pub struct CouponTerms {
    pub valid: bool,
    pub code: String,
    pub coupon_id: String,
    pub discount: f64,
    pub min_amount: Option<f64>,
    pub reusable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDecision {
    Valid,
    NotActive,
    Expired,
    AlreadyUsed,
}

/// Check order: status, then expiry date, then prior usage. A coupon whose
/// status says active but whose date has passed counts as expired.
pub fn evaluate(coupon: &Coupon, now: DateTime<Utc>, already_used: bool) -> CouponDecision {
    if coupon.status != CouponStatus::Active {
        return CouponDecision::NotActive;
    }
    if coupon.expiry_date.to_chrono() < now {
        return CouponDecision::Expired;
    }
    if already_used && !coupon.reusable {
        return CouponDecision::AlreadyUsed;
    }
    CouponDecision::Valid
}

pub struct CouponWorkflow {
    coupons: Arc<CouponDao>,
    payments: Arc<PaymentDao>,
}

impl CouponWorkflow {
    pub fn new(coupons: Arc<CouponDao>, payments: Arc<PaymentDao>) -> Self {
        Self { coupons, payments }
    }

    pub async fn apply(&self, code: &str, member_email: &str) -> WorkflowResult<CouponTerms> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Coupon not found".to_string()))?;

        let already_used = self.payments.has_used_coupon(member_email, code).await?;

        match evaluate(&coupon, Utc::now(), already_used) {
            CouponDecision::Valid => {
                let coupon_id = coupon.id.map(|id| id.to_hex()).unwrap_or_default();
                Ok(CouponTerms {
                    valid: true,
                    code: coupon.code,
                    coupon_id,
                    discount: coupon.discount,
                    min_amount: coupon.min_amount,
                    reusable: coupon.reusable,
                })
            }
            CouponDecision::NotActive => {
                Err(WorkflowError::Conflict("Coupon is not active".to_string()))
            }
            CouponDecision::Expired => {
                if let Some(id) = coupon.id {
                    let outcome = self.coupons.mark_expired(id).await?;
                    debug!(code, modified = outcome.modified_count, "Coupon marked expired");
                }
                Err(WorkflowError::Conflict("Coupon has expired".to_string()))
            }
            CouponDecision::AlreadyUsed => Err(WorkflowError::Conflict(
                "Coupon has already been used".to_string(),
            )),
        }
    }
}
