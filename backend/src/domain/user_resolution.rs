//! Email to learning-platform user resolution.

use tracing::{debug, warn};

use crate::domain::ports::{LearningPlatform, LmsUser};

/// Resolve an email to a single platform user.
///
/// When several accounts share the email the first one returned wins. An
/// empty match list or a platform error both yield `None`.
pub async fn resolve_user_by_email<P>(platform: &P, email: &str) -> Option<LmsUser>
where
    P: LearningPlatform + ?Sized,
{
    match platform.find_users_by_email(email).await {
        Ok(users) => {
            if users.len() > 1 {
                debug!(email, matches = users.len(), "multiple users share email");
            }
            users.into_iter().next()
        }
        Err(error) => {
            warn!(email, error = %error, "user lookup failed");
            None
        }
    }
}
