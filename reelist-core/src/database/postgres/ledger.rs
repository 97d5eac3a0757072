//! Scoring ledger write path.

use sqlx::PgExecutor;

use crate::error::{CoreError, Result};
use reelist_model::UserId;

/// Apply a kernel delta to a user's balance and return the new value.
///
/// The floor at zero is part of the UPDATE itself (`GREATEST(0, ...)`), not a
/// precondition check, so concurrent negative deltas cannot race the balance
/// below zero.
pub async fn apply_score_delta<'e, E>(
    executor: E,
    user_id: UserId,
    delta: i64,
) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let balance: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE users
        SET popcorn_kernels = GREATEST(0, popcorn_kernels + $1)
        WHERE user_id = $2
        RETURNING popcorn_kernels
        "#,
    )
    .bind(delta)
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    balance.ok_or_else(|| CoreError::not_found(format!("user {user_id}")))
}
