use std::sync::Arc;

use accounts::{Claims, Role};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::contract::{FeatureRequest, FeatureStatus, NewFeatureRequest};
use crate::domain::error::FeatureRequestsError;
use crate::domain::mailer::Mailer;
use crate::domain::repo::FeatureRequestsRepository;

#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn FeatureRequestsRepository>,
    mailer: Arc<dyn Mailer>,
}

impl Service {
    pub fn new(repo: Arc<dyn FeatureRequestsRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { repo, mailer }
    }

    /// Open submission; no auth. The mail notification runs detached from
    /// the response path and its failure is logged, never surfaced.
    #[instrument(name = "feature_requests.service.create", skip(self, input))]
    pub async fn create(
        &self,
        input: NewFeatureRequest,
    ) -> Result<FeatureRequest, FeatureRequestsError> {
        if input.description.trim().is_empty() {
            return Err(FeatureRequestsError::validation(
                "description",
                "description is required",
            ));
        }
        if let Some(ref email) = input.submitter_email {
            if !email.contains('@') {
                return Err(FeatureRequestsError::validation(
                    "submitterEmail",
                    "invalid email format",
                ));
            }
        }

        let now = Utc::now();
        let request = FeatureRequest {
            id: Uuid::new_v4(),
            description: input.description,
            submitter_email: input.submitter_email,
            status: FeatureStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(request.clone())
            .await
            .map_err(|e| FeatureRequestsError::database(e.to_string()))?;

        info!(request_id = %request.id, "created feature request");

        let mailer = self.mailer.clone();
        let notified = request.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.notify_new_request(&notified).await {
                warn!(request_id = %notified.id, error = %e, "feature request mail notification failed");
            }
        });

        Ok(request)
    }

    pub async fn list(&self) -> Result<Vec<FeatureRequest>, FeatureRequestsError> {
        self.repo
            .list()
            .await
            .map_err(|e| FeatureRequestsError::database(e.to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<FeatureRequest, FeatureRequestsError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| FeatureRequestsError::database(e.to_string()))?
            .ok_or(FeatureRequestsError::NotFound { id })
    }

    /// Move a request through its lifecycle. Any state can be re-entered;
    /// the lifecycle carries no one-way transitions.
    #[instrument(name = "feature_requests.service.set_status", skip(self, actor), fields(request_id = %id))]
    pub async fn set_status(
        &self,
        id: Uuid,
        status: FeatureStatus,
        actor: &Claims,
    ) -> Result<FeatureRequest, FeatureRequestsError> {
        require_admin(actor)?;

        let mut current = self.get(id).await?;
        current.status = status;
        current.updated_at = Utc::now();

        self.repo
            .update(current.clone())
            .await
            .map_err(|e| FeatureRequestsError::database(e.to_string()))?;

        info!(status = status.as_str(), "feature request status changed");
        Ok(current)
    }

    #[instrument(name = "feature_requests.service.delete", skip(self, actor), fields(request_id = %id))]
    pub async fn delete(&self, id: Uuid, actor: &Claims) -> Result<(), FeatureRequestsError> {
        require_admin(actor)?;

        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|e| FeatureRequestsError::database(e.to_string()))?;
        if !removed {
            return Err(FeatureRequestsError::NotFound { id });
        }
        info!("deleted feature request");
        Ok(())
    }
}

fn require_admin(actor: &Claims) -> Result<(), FeatureRequestsError> {
    if actor.role.satisfies(Role::Admin) {
        Ok(())
    } else {
        Err(FeatureRequestsError::Forbidden {
            required: Role::Admin,
        })
    }
}
