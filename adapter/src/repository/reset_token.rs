use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, TimeDelta, Utc};
use kernel::model::id::UserId;
use kernel::repository::reset_token::ResetTokenRepository;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use shared::error::AppResult;

// 32 bytes of OS randomness per token, so tokens cannot be guessed.
const TOKEN_BYTES: usize = 32;

#[derive(Debug)]
struct TokenEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

// Process-local store for password-reset tokens. Entries live entirely in
// memory: a restart invalidates all outstanding tokens, which is acceptable
// for a credential that is minted on demand and short-lived.
#[derive(Default)]
pub struct ResetTokenRepositoryImpl {
    tokens: Mutex<HashMap<String, TokenEntry>>,
}

impl ResetTokenRepositoryImpl {
    pub fn new() -> Self {
        Self::default()
    }

    // Expired entries are already unredeemable; this only reclaims memory.
    pub fn evict_expired(&self, now: DateTime<Utc>) {
        self.tokens.lock().retain(|_, entry| now < entry.expires_at);
    }

    fn generate_token() -> String {
        let mut buf = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut buf);
        general_purpose::URL_SAFE_NO_PAD.encode(buf)
    }
}

#[async_trait]
impl ResetTokenRepository for ResetTokenRepositoryImpl {
    async fn create_token(&self, user_id: UserId, lifetime: TimeDelta) -> AppResult<String> {
        let token = Self::generate_token();
        let entry = TokenEntry {
            user_id,
            expires_at: Utc::now() + lifetime,
        };
        self.tokens.lock().insert(token.clone(), entry);

        Ok(token)
    }

    async fn consume_token(&self, token: &str) -> AppResult<Option<UserId>> {
        // Removal under the lock decides the winner; a concurrent caller
        // presenting the same token finds the slot already empty. Expired
        // entries are removed as well but never returned, so the caller
        // cannot tell an expired token from one that never existed.
        let removed = self.tokens.lock().remove(token);

        Ok(match removed {
            Some(entry) if Utc::now() < entry.expires_at => Some(entry.user_id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn a_token_is_consumable_exactly_once() {
        let repo = ResetTokenRepositoryImpl::new();
        let token = repo
            .create_token(user(7), TimeDelta::minutes(30))
            .await
            .unwrap();

        assert_eq!(repo.consume_token(&token).await.unwrap(), Some(user(7)));
        assert_eq!(repo.consume_token(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_tokens_are_not_consumable() {
        let repo = ResetTokenRepositoryImpl::new();
        assert_eq!(repo.consume_token("no-such-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn zero_or_negative_lifetimes_expire_at_creation() {
        let repo = ResetTokenRepositoryImpl::new();

        let dead_on_arrival = repo.create_token(user(7), TimeDelta::zero()).await.unwrap();
        assert_eq!(repo.consume_token(&dead_on_arrival).await.unwrap(), None);

        let negative = repo
            .create_token(user(7), TimeDelta::minutes(-5))
            .await
            .unwrap();
        assert_eq!(repo.consume_token(&negative).await.unwrap(), None);
    }

    #[tokio::test]
    async fn a_user_may_hold_several_outstanding_tokens() {
        let repo = ResetTokenRepositoryImpl::new();
        let first = repo
            .create_token(user(7), TimeDelta::minutes(30))
            .await
            .unwrap();
        let second = repo
            .create_token(user(7), TimeDelta::minutes(30))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(repo.consume_token(&second).await.unwrap(), Some(user(7)));
        assert_eq!(repo.consume_token(&first).await.unwrap(), Some(user(7)));
    }

    #[tokio::test]
    async fn tokens_are_url_safe_and_long_enough() {
        let repo = ResetTokenRepositoryImpl::new();
        let token = repo
            .create_token(user(7), TimeDelta::minutes(30))
            .await
            .unwrap();

        // 32 bytes of randomness encode to 43 unpadded base64 characters.
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn concurrent_consumption_has_a_single_winner() {
        let repo = Arc::new(ResetTokenRepositoryImpl::new());
        let token = repo
            .create_token(user(7), TimeDelta::minutes(30))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = Arc::clone(&repo);
            let token = token.clone();
            handles.push(tokio::spawn(
                async move { repo.consume_token(&token).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn eviction_drops_only_expired_entries() {
        let repo = ResetTokenRepositoryImpl::new();
        let expired = repo
            .create_token(user(7), TimeDelta::minutes(-5))
            .await
            .unwrap();
        let live = repo
            .create_token(user(8), TimeDelta::minutes(30))
            .await
            .unwrap();

        repo.evict_expired(Utc::now());

        assert_eq!(repo.consume_token(&expired).await.unwrap(), None);
        assert_eq!(repo.consume_token(&live).await.unwrap(), Some(user(8)));
    }
}
