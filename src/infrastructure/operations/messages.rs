use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::to_json;
use crate::domain::operation::{params_schema, parse_params};
use crate::domain::{
    DomainError, MessageFilter, MessagingRepository, NewMessage, Operation, OperationContext,
    Page,
};

const DEFAULT_LAST_SENT_LIMIT: usize = 5;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessagesParams {
    pub conversation_id: String,
    /// Maximum number of messages to return
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of most recent messages to skip
    #[serde(default)]
    pub start: Option<usize>,
}

#[derive(Debug)]
pub struct GetMessagesByConversation {
    repository: Arc<dyn MessagingRepository>,
}

impl GetMessagesByConversation {
    pub const NAME: &'static str = "GetMessagesByConversation";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for GetMessagesByConversation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Retrieves messages from a specific conversation, ordered by most recent first. \
         Use limit and start for pagination."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<ConversationMessagesParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: ConversationMessagesParams = parse_params(Self::NAME, params)?;
        let messages = self
            .repository
            .list_messages(
                &MessageFilter::new().conversation(params.conversation_id),
                Page::new(params.start.unwrap_or(0), params.limit),
            )
            .await?;

        to_json(Self::NAME, messages)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastSentParams {
    pub sender_id: String,
    /// Defaults to 5
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub start: Option<usize>,
}

/// Most recent messages sent by a user, leaving out those addressed to the assistant
#[derive(Debug)]
pub struct GetLastSentMessages {
    repository: Arc<dyn MessagingRepository>,
    assistant_id: String,
}

impl GetLastSentMessages {
    pub const NAME: &'static str = "GetLastSentMessages";

    pub fn new(repository: Arc<dyn MessagingRepository>, assistant_id: impl Into<String>) -> Self {
        Self {
            repository,
            assistant_id: assistant_id.into(),
        }
    }
}

#[async_trait]
impl Operation for GetLastSentMessages {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Retrieves the last messages sent by a specific user, ordered by most recent first."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<LastSentParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: LastSentParams = parse_params(Self::NAME, params)?;
        let filter = MessageFilter::new()
            .sender(params.sender_id)
            .exclude_receiver(&self.assistant_id);
        let page = Page::new(
            params.start.unwrap_or(0),
            Some(params.limit.unwrap_or(DEFAULT_LAST_SENT_LIMIT)),
        );

        let messages = self.repository.list_messages(&filter, page).await?;
        to_json(Self::NAME, messages)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BetweenUsersParams {
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub start: Option<usize>,
}

/// Messages of the conversation shared by two users; empty when they have none
#[derive(Debug)]
pub struct GetConversationMessagesBetweenUsers {
    repository: Arc<dyn MessagingRepository>,
}

impl GetConversationMessagesBetweenUsers {
    pub const NAME: &'static str = "GetConversationMessagesBetweenUsers";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for GetConversationMessagesBetweenUsers {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Retrieves messages exchanged between two specific users, most recent first."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<BetweenUsersParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: BetweenUsersParams = parse_params(Self::NAME, params)?;
        let participants = [params.sender_id, params.receiver_id];

        let Some(conversation) = self
            .repository
            .find_conversation_by_participants(&participants)
            .await?
        else {
            return Ok(Value::Array(Vec::new()));
        };

        let messages = self
            .repository
            .list_messages(
                &MessageFilter::new().conversation(conversation.id),
                Page::new(params.start.unwrap_or(0), params.limit),
            )
            .await?;

        to_json(Self::NAME, messages)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// Must be the current user
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub conversation_id: String,
}

/// Sends a message as the acting user; sending on behalf of anyone else is refused
#[derive(Debug)]
pub struct SendMessage {
    repository: Arc<dyn MessagingRepository>,
}

impl SendMessage {
    pub const NAME: &'static str = "SendMessage";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for SendMessage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Sends a new message in a conversation. The sender must be the current user. \
         Returns the stored message."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<SendMessageParams>()
    }

    async fn invoke(
        &self,
        params: Value,
        context: &OperationContext,
    ) -> Result<Value, DomainError> {
        let params: SendMessageParams = parse_params(Self::NAME, params)?;

        if params.sender_id != context.actor_id() {
            warn!(
                actor_id = %context.actor_id(),
                sender_id = %params.sender_id,
                "Refused to send a message on behalf of another user"
            );
            return Err(DomainError::permission_denied(format!(
                "User '{}' cannot send messages as '{}'",
                context.actor_id(),
                params.sender_id
            )));
        }

        let message = self
            .repository
            .create_message(NewMessage {
                conversation_id: params.conversation_id,
                sender_id: params.sender_id,
                receiver_id: params.receiver_id,
                content: params.content,
            })
            .await?;

        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            "Message sent"
        );
        to_json(Self::NAME, message)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatisticsParams {
    pub user_id: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessageStatistics {
    pub sent_count: usize,
    pub received_count: usize,
    pub total_count: usize,
}

#[derive(Debug)]
pub struct GetUserMessageStatistics {
    repository: Arc<dyn MessagingRepository>,
}

impl GetUserMessageStatistics {
    pub const NAME: &'static str = "GetUserMessageStatistics";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for GetUserMessageStatistics {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Returns messaging statistics for a user: messages sent, received and in total."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<UserStatisticsParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: UserStatisticsParams = parse_params(Self::NAME, params)?;

        let sent_count = self
            .repository
            .count_messages(&MessageFilter::new().sender(&params.user_id))
            .await?;
        let received_count = self
            .repository
            .count_messages(&MessageFilter::new().receiver(&params.user_id))
            .await?;

        to_json(
            Self::NAME,
            UserMessageStatistics {
                sent_count,
                received_count,
                total_count: sent_count + received_count,
            },
        )
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMessagesParams {
    pub user_id: String,
    /// Keyword or phrase, matched case-insensitively
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Keyword search over messages a user sent or received
#[derive(Debug)]
pub struct SearchUserMessages {
    repository: Arc<dyn MessagingRepository>,
}

impl SearchUserMessages {
    pub const NAME: &'static str = "SearchUserMessages";

    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Operation for SearchUserMessages {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Searches through a user's sent and received messages for a specific keyword or phrase."
    }

    fn parameters_schema(&self) -> Value {
        params_schema::<SearchMessagesParams>()
    }

    async fn invoke(&self, params: Value, _: &OperationContext) -> Result<Value, DomainError> {
        let params: SearchMessagesParams = parse_params(Self::NAME, params)?;
        let filter = MessageFilter::new()
            .involving(params.user_id)
            .content_contains(params.query);

        let messages = self
            .repository
            .list_messages(&filter, Page::new(0, params.limit))
            .await?;
        to_json(Self::NAME, messages)
    }
}
