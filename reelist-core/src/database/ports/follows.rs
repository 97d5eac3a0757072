//! Follow graph storage port.

use async_trait::async_trait;

use crate::error::Result;
use reelist_model::{FollowPeer, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Create a directed follow edge. Self-edges are `Validation` errors;
    /// an existing edge is a no-op.
    async fn follow(&self, follower: UserId, following: UserId) -> Result<()>;

    async fn unfollow(&self, follower: UserId, following: UserId) -> Result<()>;

    /// Users following `target`, each annotated with whether `viewer`
    /// follows them back.
    async fn followers_of(
        &self,
        target: UserId,
        viewer: UserId,
    ) -> Result<Vec<FollowPeer>>;

    /// Users that `target` follows, annotated the same way.
    async fn following_of(
        &self,
        target: UserId,
        viewer: UserId,
    ) -> Result<Vec<FollowPeer>>;
}
