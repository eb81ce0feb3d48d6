use std::sync::Arc;

use bson::{DateTime, oid::ObjectId};
use tracing::warn;

use homehaven_db::models::{Payment, PaymentStatus};

use crate::dao::{agreement::AgreementDao, payment::PaymentDao};

use super::{WorkflowError, WorkflowResult};

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub member_email: String,
    pub agreement_id: Option<ObjectId>,
    pub month: String,
    pub amount: f64,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    /// Checkout-confirmed payment, stored completed.
    Completed,
    /// Manual payment request, stored pending until settled.
    Requested,
}

pub struct PaymentWorkflow {
    payments: Arc<PaymentDao>,
    agreements: Arc<AgreementDao>,
}

impl PaymentWorkflow {
    pub fn new(payments: Arc<PaymentDao>, agreements: Arc<AgreementDao>) -> Self {
        Self {
            payments,
            agreements,
        }
    }

    /// Records a payment for the member's billing month. Completed payments
    /// conflict with an existing completed one; requests also conflict with a
    /// pending one. On success the linked agreement's last-payment fields are
    /// refreshed (best effort, after the insert).
    pub async fn record(&self, new: NewPayment, kind: PaymentKind) -> WorkflowResult<Payment> {
        if new.member_email.is_empty() {
            return Err(WorkflowError::Invalid("Missing member email".to_string()));
        }
        if !valid_month(&new.month) {
            return Err(WorkflowError::Invalid(
                "Month must be formatted YYYY-MM".to_string(),
            ));
        }
        if new.amount <= 0.0 {
            return Err(WorkflowError::Invalid(
                "Amount must be positive".to_string(),
            ));
        }

        let blocking: &[PaymentStatus] = match kind {
            PaymentKind::Completed => &[PaymentStatus::Completed],
            PaymentKind::Requested => &[PaymentStatus::Pending, PaymentStatus::Completed],
        };
        if let Some(existing) = self
            .payments
            .find_for_month(&new.member_email, &new.month, blocking)
            .await?
        {
            let message = match existing.status {
                PaymentStatus::Pending => "Pending payment already exists for this month",
                PaymentStatus::Completed => "Payment for this month already exists",
            };
            return Err(WorkflowError::Conflict(message.to_string()));
        }

        let now = DateTime::now();
        let payment = Payment {
            id: None,
            member_email: new.member_email,
            agreement_id: new.agreement_id,
            month: new.month,
            amount: new.amount,
            coupon_code: new.coupon_code,
            status: match kind {
                PaymentKind::Completed => PaymentStatus::Completed,
                PaymentKind::Requested => PaymentStatus::Pending,
            },
            created_at: now,
            updated_at: now,
        };

        let id = self.payments.insert(&payment).await?;

        if kind == PaymentKind::Completed {
            if let Some(agreement_id) = payment.agreement_id {
                if let Err(e) = self
                    .agreements
                    .set_last_payment(agreement_id, &payment.month)
                    .await
                {
                    // Payment is already stored; surface the failure without
                    // undoing the insert.
                    warn!(payment_id = %id, error = %e, "Payment recorded but agreement not updated");
                    return Err(e.into());
                }
            }
        }

        Ok(self.payments.base.find_by_id(id).await?)
    }
}

/// "YYYY-MM" with a real month number.
pub fn valid_month(month: &str) -> bool {
    let Some((year, month)) = month.split_once('-') else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 {
        return false;
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match month.parse::<u8>() {
        Ok(m) => (1..=12).contains(&m),
        Err(_) => false,
    }
}
