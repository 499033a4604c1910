use async_trait::async_trait;
use chrono::TimeDelta;
use shared::error::AppResult;

use crate::model::id::UserId;

#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    // Mints an opaque single-use token bound to the user. Several tokens may
    // be outstanding for the same user at once.
    async fn create_token(&self, user_id: UserId, lifetime: TimeDelta) -> AppResult<String>;
    // Redeems a token at most once. Unknown, expired and already-consumed
    // tokens are indistinguishable to the caller.
    async fn consume_token(&self, token: &str) -> AppResult<Option<UserId>>;
}
