use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::to_json;
use crate::domain::operation::{params_schema, parse_params};
use crate::domain::{DomainError, MessagingRepository, Operation, OperationContext};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchUserByNameParams {
    /// Full or partial name, matched case-insensitively
    pub name: String,
}

/// Resolves a name to the id of the first matching user, or `null`
#[derive(Debug)]
pub struct SearchUserByName {
    repository: Arc<dyn MessagingRepository>,
}

impl SearchUserByName {
    pub const NAME: &'static str = "SearchUserByName";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for SearchUserByName {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Searches for users by name with case-insensitive partial matching. \
         Returns the ID of the first matching user, or null when nobody matches."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<SearchUserByNameParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: SearchUserByNameParams = parse_params(Self::NAME, params)?;
        let users = self.repository.search_users_by_name(&params.name).await?;

        Ok(users
            .into_iter()
            .next()
            .map_or(Value::Null, |user| Value::String(user.id)))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetUserDetailsParams {
    pub user_id: String,
}

#[derive(Debug)]
pub struct GetUserDetails {
    repository: Arc<dyn MessagingRepository>,
}

impl GetUserDetails {
    pub const NAME: &'static str = "GetUserDetails";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for GetUserDetails {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Gets detailed information about a user by their unique ID."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<GetUserDetailsParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: GetUserDetailsParams = parse_params(Self::NAME, params)?;
        let user = self.repository.find_user(&params.user_id).await?;
        to_json(Self::NAME, user)
    }
}
