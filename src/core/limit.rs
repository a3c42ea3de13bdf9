//! Daily transfer limit evaluation.
//!
//! "Already spent" is the sum of this card's outgoing transfers created
//! within the current local day with status `PENDING` or `COMPLETED`.
//! Failed attempts never consume limit budget. The ceiling is an immutable
//! [`LimitPolicy`] built once at startup, never ambient process state.

use crate::entities::{Transfer, TransferStatus, transfer};
use crate::errors::{Error, Result};
use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, prelude::*};

/// The configured daily transfer ceiling, in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitPolicy {
    daily_ceiling: Option<i64>,
}

impl LimitPolicy {
    /// No ceiling: every transfer passes the limit check.
    pub const fn unlimited() -> Self {
        Self {
            daily_ceiling: None,
        }
    }

    /// A daily ceiling in minor units.
    pub const fn daily(ceiling: i64) -> Self {
        Self {
            daily_ceiling: Some(ceiling),
        }
    }

    /// Whether a ceiling is configured at all. `remaining_daily_limit`
    /// returns `0` both when exhausted and when unconfigured; callers that
    /// must tell the two apart check this first.
    pub const fn is_limited(&self) -> bool {
        self.daily_ceiling.is_some()
    }

    /// The configured ceiling, if any.
    pub const fn daily_ceiling(&self) -> Option<i64> {
        self.daily_ceiling
    }
}

/// The local-day window containing `now`: `[local midnight, +24h)`.
///
/// A transfer created at exactly midnight belongs to the new day.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_naive = now.with_timezone(&Local).date_naive().and_time(NaiveTime::MIN);
    // A DST gap exactly at midnight leaves no local representation; fall
    // back to reading the naive midnight as UTC
    let start = start_naive.and_local_timezone(Local).earliest().map_or_else(
        || Utc.from_utc_datetime(&start_naive),
        |dt| dt.with_timezone(&Utc),
    );
    (start, start + Duration::hours(24))
}

/// Sums the card's outgoing `PENDING`/`COMPLETED` transfers in the local-day
/// window containing `now`.
pub async fn spent_today<C>(db: &C, card_id: i64, now: DateTime<Utc>) -> Result<i64>
where
    C: ConnectionTrait,
{
    let (from, to) = day_window(now);
    let transfers = Transfer::find()
        .filter(transfer::Column::FromCardId.eq(card_id))
        .filter(transfer::Column::CreatedAt.gte(from))
        .filter(transfer::Column::CreatedAt.lt(to))
        .filter(
            transfer::Column::Status.is_in([TransferStatus::Pending, TransferStatus::Completed]),
        )
        .all(db)
        .await?;
    Ok(transfers.iter().map(|t| t.amount).sum())
}

/// Fails with [`Error::LimitExceeded`] if spending `amount` would push the
/// card past the configured ceiling. The boundary is inclusive: spending
/// exactly up to the ceiling is allowed.
pub async fn validate_daily_limit<C>(
    db: &C,
    policy: LimitPolicy,
    card_id: i64,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(limit) = policy.daily_ceiling() else {
        return Ok(());
    };
    let spent = spent_today(db, card_id, now).await?;
    if spent + amount > limit {
        return Err(Error::LimitExceeded { limit });
    }
    Ok(())
}

/// `max(0, ceiling - spent)`. Returns `0` when the ceiling is exceeded and
/// `0` when no ceiling is configured; never a negative value and never an
/// "unlimited" sentinel.
pub async fn remaining_daily_limit<C>(
    db: &C,
    policy: LimitPolicy,
    card_id: i64,
    now: DateTime<Utc>,
) -> Result<i64>
where
    C: ConnectionTrait,
{
    let Some(limit) = policy.daily_ceiling() else {
        return Ok(0);
    };
    let spent = spent_today(db, card_id, now).await?;
    Ok((limit - spent).max(0))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_card, insert_transfer_row, setup_test_db};

    #[tokio::test]
    async fn test_boundary_is_inclusive() -> Result<()> {
        let db = setup_test_db().await?;
        let from = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let to = create_test_card(&db, 2, "4111222233334444", 0).await?;
        let policy = LimitPolicy::daily(50_000);
        let now = Utc::now();

        // Already spent 400.00 today
        insert_transfer_row(&db, from.id, to.id, 40_000, TransferStatus::Completed, now).await?;

        // 100.00 lands exactly on the ceiling: allowed
        validate_daily_limit(&db, policy, from.id, 10_000, now).await?;

        // 100.01 is the first unit beyond it: rejected, carrying the ceiling
        let result = validate_daily_limit(&db, policy, from.id, 10_001, now).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::LimitExceeded { limit: 50_000 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_transfers_do_not_consume_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let from = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let to = create_test_card(&db, 2, "4111222233334444", 0).await?;
        let now = Utc::now();

        insert_transfer_row(&db, from.id, to.id, 40_000, TransferStatus::Failed, now).await?;
        insert_transfer_row(&db, from.id, to.id, 1_000, TransferStatus::Completed, now).await?;
        insert_transfer_row(&db, from.id, to.id, 2_000, TransferStatus::Pending, now).await?;

        assert_eq!(spent_today(&db, from.id, now).await?, 3_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_only_outgoing_transfers_count() -> Result<()> {
        let db = setup_test_db().await?;
        let card = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let other = create_test_card(&db, 2, "4111222233334444", 100_000).await?;
        let now = Utc::now();

        insert_transfer_row(&db, card.id, other.id, 5_000, TransferStatus::Completed, now).await?;
        // Incoming transfer: not part of this card's spend
        insert_transfer_row(&db, other.id, card.id, 7_000, TransferStatus::Completed, now).await?;

        assert_eq!(spent_today(&db, card.id, now).await?, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_window_boundaries() -> Result<()> {
        let db = setup_test_db().await?;
        let from = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let to = create_test_card(&db, 2, "4111222233334444", 0).await?;
        let now = Utc::now();
        let (start, end) = day_window(now);

        // One second before midnight belongs to the previous day
        let before = start - Duration::seconds(1);
        insert_transfer_row(&db, from.id, to.id, 1_111, TransferStatus::Completed, before).await?;
        // Exactly midnight belongs to the new day
        insert_transfer_row(&db, from.id, to.id, 2_222, TransferStatus::Completed, start).await?;
        // End of window is exclusive
        insert_transfer_row(&db, from.id, to.id, 4_444, TransferStatus::Completed, end).await?;

        assert_eq!(spent_today(&db, from.id, now).await?, 2_222);

        Ok(())
    }

    #[tokio::test]
    async fn test_remaining_never_negative() -> Result<()> {
        let db = setup_test_db().await?;
        let from = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let to = create_test_card(&db, 2, "4111222233334444", 0).await?;
        let policy = LimitPolicy::daily(50_000);
        let now = Utc::now();

        // Spent 700.00 against a 500.00 ceiling
        insert_transfer_row(&db, from.id, to.id, 70_000, TransferStatus::Completed, now).await?;

        assert_eq!(remaining_daily_limit(&db, policy, from.id, now).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unlimited_policy() -> Result<()> {
        let db = setup_test_db().await?;
        let from = create_test_card(&db, 1, "4000123456789010", 100_000).await?;
        let now = Utc::now();
        let policy = LimitPolicy::unlimited();

        // Any amount passes the check
        validate_daily_limit(&db, policy, from.id, i64::MAX / 2, now).await?;
        // But remaining reports zero, same as fully spent; callers use
        // is_limited() to tell the cases apart
        assert_eq!(remaining_daily_limit(&db, policy, from.id, now).await?, 0);
        assert!(!policy.is_limited());
        assert!(LimitPolicy::daily(1).is_limited());

        Ok(())
    }

    #[test]
    fn test_day_window_covers_24_hours() {
        let now = Utc::now();
        let (start, end) = day_window(now);
        assert_eq!(end - start, Duration::hours(24));
        assert!(start <= now && now < end);
    }
}
