use std::sync::Arc;

use bson::oid::ObjectId;
use tracing::warn;

use homehaven_db::models::{Agreement, AgreementStatus, ApartmentStatus, Role};

use crate::dao::{agreement::AgreementDao, apartment::ApartmentDao, user::UserDao};

use super::{WorkflowError, WorkflowResult};

pub struct AgreementWorkflow {
    users: Arc<UserDao>,
    agreements: Arc<AgreementDao>,
    apartments: Arc<ApartmentDao>,
}

impl AgreementWorkflow {
    pub fn new(
        users: Arc<UserDao>,
        agreements: Arc<AgreementDao>,
        apartments: Arc<ApartmentDao>,
    ) -> Self {
        Self {
            users,
            agreements,
            apartments,
        }
    }

    /// Creates a pending agreement for the caller. One unresolved agreement
    /// per user: a second request is rejected until the first is accepted,
    /// rejected, or withdrawn.
    pub async fn request(
        &self,
        user_email: String,
        apartment_id: ObjectId,
    ) -> WorkflowResult<Agreement> {
        if self
            .agreements
            .find_active_for_user(&user_email)
            .await?
            .is_some()
        {
            return Err(WorkflowError::Conflict(
                "You already have a pending or accepted agreement".to_string(),
            ));
        }

        let apartment = self
            .apartments
            .base
            .find_by_id(apartment_id)
            .await
            .map_err(|e| WorkflowError::from_lookup(e, "Apartment not found"))?;

        Ok(self
            .agreements
            .create(user_email, apartment_id, apartment.rent)
            .await?)
    }

    /// Accepts a pending agreement, promotes the user to member and books the
    /// apartment. The three writes are sequential; a failure after the first
    /// leaves the agreement accepted with the promotion missing.
    pub async fn accept(&self, id: ObjectId) -> WorkflowResult<Agreement> {
        let agreement = self
            .agreements
            .base
            .find_by_id(id)
            .await
            .map_err(|e| WorkflowError::from_lookup(e, "Agreement not found"))?;

        if agreement.status != AgreementStatus::Pending {
            return Err(WorkflowError::Conflict(
                "Agreement is not pending".to_string(),
            ));
        }

        let apartment = self
            .apartments
            .base
            .find_by_id(agreement.apartment_id)
            .await
            .map_err(|e| WorkflowError::from_lookup(e, "Apartment not found"))?;
        if apartment.status == ApartmentStatus::Booked {
            return Err(WorkflowError::Conflict(
                "Apartment is already booked".to_string(),
            ));
        }

        self.agreements
            .set_status(id, AgreementStatus::Accepted)
            .await?;

        if let Err(e) = self
            .users
            .set_membership(&agreement.user_email, agreement.apartment_id)
            .await
        {
            warn!(agreement_id = %id, error = %e, "Agreement accepted but member promotion failed");
            return Err(e.into());
        }

        if let Err(e) = self
            .apartments
            .set_status(agreement.apartment_id, ApartmentStatus::Booked)
            .await
        {
            warn!(agreement_id = %id, error = %e, "Agreement accepted but apartment not marked booked");
            return Err(e.into());
        }

        Ok(self.agreements.base.find_by_id(id).await?)
    }

    pub async fn reject(&self, id: ObjectId) -> WorkflowResult<Agreement> {
        let agreement = self
            .agreements
            .base
            .find_by_id(id)
            .await
            .map_err(|e| WorkflowError::from_lookup(e, "Agreement not found"))?;

        if agreement.status != AgreementStatus::Pending {
            return Err(WorkflowError::Conflict(
                "Agreement is not pending".to_string(),
            ));
        }

        self.agreements
            .set_status(id, AgreementStatus::Rejected)
            .await?;
        Ok(self.agreements.base.find_by_id(id).await?)
    }

    /// Deletes an agreement. Admins may remove any; owners only their own and
    /// only while it is still pending. Removing an accepted agreement reverts
    /// the member and frees the apartment.
    pub async fn remove(
        &self,
        id: ObjectId,
        requester_email: &str,
        requester_role: Role,
    ) -> WorkflowResult<u64> {
        let agreement = self
            .agreements
            .base
            .find_by_id(id)
            .await
            .map_err(|e| WorkflowError::from_lookup(e, "Agreement not found"))?;

        if !can_remove(&agreement, requester_email, requester_role) {
            return Err(WorkflowError::Forbidden("Forbidden access".to_string()));
        }

        let deleted = self.agreements.base.delete_by_id(id).await?;

        if agreement.status == AgreementStatus::Accepted {
            if let Err(e) = self.users.clear_membership(&agreement.user_email).await {
                warn!(agreement_id = %id, error = %e, "Agreement deleted but member demotion failed");
                return Err(e.into());
            }
            if let Err(e) = self
                .apartments
                .set_status(agreement.apartment_id, ApartmentStatus::Available)
                .await
            {
                warn!(agreement_id = %id, error = %e, "Agreement deleted but apartment not freed");
                return Err(e.into());
            }
        }

        Ok(deleted)
    }
}

/// Removal permission: admin, or the owner while the agreement is pending.
pub fn can_remove(agreement: &Agreement, requester_email: &str, requester_role: Role) -> bool {
    if requester_role == Role::Admin {
        return true;
    }
    agreement.user_email == requester_email && agreement.status == AgreementStatus::Pending
}
