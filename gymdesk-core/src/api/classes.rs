use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Class, ClassWithMembers, EnrollRequest, Message};
use crate::recurrence::RecurringCreateError;
use crate::resource::join_all;

/// What the backend did with an enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrollment {
    Enrolled,
    /// The class was full; the member went on the wait list.
    WaitListed,
}

impl Enrollment {
    fn from_message(message: &str) -> Self {
        if message.to_ascii_lowercase().contains("waitlist") {
            Enrollment::WaitListed
        } else {
            Enrollment::Enrolled
        }
    }
}

impl ApiClient {
    /// `GET /api/classes/{id}/details`: the class with member records for
    /// the enrolled list and the wait list.
    pub async fn class_details(&self, class_id: &str) -> ApiResult<ClassWithMembers> {
        self.get_json(self.endpoint(["api", "classes", class_id, "details"]))
            .await
    }

    /// `POST /api/classes/{id}/enroll`. A full class puts the member on the
    /// wait list instead of failing.
    pub async fn enroll(&self, class_id: &str, member_id: &str) -> ApiResult<Enrollment> {
        let message: Message = self
            .post_json(
                self.endpoint(["api", "classes", class_id, "enroll"]),
                &EnrollRequest { member_id },
            )
            .await?;

        debug!(class_id, member_id, message = %message.message, "enrolled");
        Ok(Enrollment::from_message(&message.message))
    }

    /// `DELETE /api/classes/{id}/unenroll/{member_id}`. The backend promotes
    /// the head of the wait list, if any.
    pub async fn unenroll(&self, class_id: &str, member_id: &str) -> ApiResult<()> {
        self.delete(self.endpoint(["api", "classes", class_id, "unenroll", member_id]))
            .await
    }

    /// Enroll several members concurrently. One outcome per member id.
    pub async fn enroll_many(
        &self,
        class_id: &str,
        member_ids: &[String],
    ) -> Vec<(String, ApiResult<Enrollment>)> {
        let mut set = JoinSet::new();

        for member_id in member_ids {
            let client = self.clone();
            let class_id = class_id.to_string();
            let member_id = member_id.clone();
            set.spawn(async move {
                let result = client.enroll(&class_id, &member_id).await;
                (member_id, result)
            });
        }

        join_all(set).await
    }

    /// Create each class in order, stopping at the first rejection.
    pub async fn create_recurring(
        &self,
        classes: Vec<Class>,
    ) -> Result<Vec<Class>, RecurringCreateError> {
        let total = classes.len();
        let mut created = Vec::with_capacity(total);

        for class in classes {
            match self.resources::<Class>().create(&class).await {
                Ok(saved) => created.push(saved),
                Err(source) => {
                    return Err(RecurringCreateError {
                        created,
                        total,
                        failed_date: class.date,
                        source,
                    });
                }
            }
        }

        info!("created {} recurring classes", created.len());
        Ok(created)
    }
}
