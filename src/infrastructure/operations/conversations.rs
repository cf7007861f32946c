use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::to_json;
use crate::domain::operation::{params_schema, parse_params};
use crate::domain::{
    DomainError, MessageFilter, MessagingRepository, Operation, OperationContext,
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsParams {
    /// User IDs of every participant
    pub participants: Vec<String>,
}

/// Looks up the id of a conversation that includes all given participants
#[derive(Debug)]
pub struct FindConversationIdByParticipants {
    repository: Arc<dyn MessagingRepository>,
}

impl FindConversationIdByParticipants {
    pub const NAME: &'static str = "FindConversationIdByParticipants";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for FindConversationIdByParticipants {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Finds the ID of an existing conversation between specific participants. \
         Input is an array of user IDs. Returns null when no such conversation exists."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<ParticipantsParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: ParticipantsParams = parse_params(Self::NAME, params)?;
        let conversation = self
            .repository
            .find_conversation_by_participants(&params.participants)
            .await?;

        Ok(conversation.map_or(Value::Null, |c| Value::String(c.id)))
    }
}

#[derive(Debug)]
pub struct CreateNewConversation {
    repository: Arc<dyn MessagingRepository>,
}

impl CreateNewConversation {
    pub const NAME: &'static str = "CreateNewConversation";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for CreateNewConversation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Creates a new conversation with the specified participants. \
         Returns the ID of the new conversation."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<ParticipantsParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: ParticipantsParams = parse_params(Self::NAME, params)?;
        let conversation = self
            .repository
            .create_conversation(params.participants)
            .await?;

        Ok(Value::String(conversation.id))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdParams {
    pub user_id: String,
}

#[derive(Debug)]
pub struct ListUserConversations {
    repository: Arc<dyn MessagingRepository>,
}

impl ListUserConversations {
    pub const NAME: &'static str = "ListUserConversations";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for ListUserConversations {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Gets a list of all conversation threads a user is participating in."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<UserIdParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: UserIdParams = parse_params(Self::NAME, params)?;
        let conversations = self
            .repository
            .list_conversations_for(&params.user_id)
            .await?;

        to_json(Self::NAME, conversations)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationIdParams {
    pub conversation_id: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStatistics {
    pub message_count: usize,
    pub participant_count: usize,
}

/// Message and participant counts; an unknown conversation counts as empty
#[derive(Debug)]
pub struct GetConversationStatistics {
    repository: Arc<dyn MessagingRepository>,
}

impl GetConversationStatistics {
    pub const NAME: &'static str = "GetConversationStatistics";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for GetConversationStatistics {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Provides statistics for a specific conversation: the total number of messages \
         and the number of participants."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<ConversationIdParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: ConversationIdParams = parse_params(Self::NAME, params)?;
        let filter = MessageFilter::new().conversation(&params.conversation_id);

        let message_count = self.repository.count_messages(&filter).await?;
        let participant_count = self
            .repository
            .find_conversation(&params.conversation_id)
            .await?
            .map_or(0, |c| c.participants.len());

        to_json(
            Self::NAME,
            ConversationStatistics {
                message_count,
                participant_count,
            },
        )
    }
}
