//! Evenly spaced timestamps for bulk seeding.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use crate::error::GenerationError;

/// Spread `count` timestamps linearly from `now - window` to `now`.
///
/// Index 0 is the oldest and the last index equals `now` (truncated to
/// milliseconds). Offsets are computed in whole milliseconds. A single
/// timestamp is placed at `now`; zero yields an empty schedule.
///
/// # Errors
///
/// Returns [`GenerationError::NegativeWindow`] when `window` is negative and
/// [`GenerationError::TimestampOutOfRange`] when the window start cannot be
/// represented.
///
/// # Example
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use webhook_fixtures::linear_schedule;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).single().expect("date");
/// let schedule = linear_schedule(now, 4, TimeDelta::days(3)).expect("schedule");
///
/// assert_eq!(schedule.first(), Some(&(now - TimeDelta::days(3))));
/// assert_eq!(schedule.last(), Some(&now));
/// ```
pub fn linear_schedule(
    now: DateTime<Utc>,
    count: usize,
    window: TimeDelta,
) -> Result<Vec<DateTime<Utc>>, GenerationError> {
    let window_ms = window.num_milliseconds();
    if window_ms < 0 {
        return Err(GenerationError::NegativeWindow { window_ms });
    }

    let end = now.trunc_subsecs(3);
    let Some(last_index) = count.checked_sub(1) else {
        return Ok(Vec::new());
    };
    if last_index == 0 {
        return Ok(vec![end]);
    }

    let start = end
        .checked_sub_signed(TimeDelta::milliseconds(window_ms))
        .ok_or(GenerationError::TimestampOutOfRange)?;
    let span = i128::from(window_ms);
    let steps = to_i128(last_index)?;

    (0..count)
        .map(|index| {
            let offset = span
                .checked_mul(to_i128(index)?)
                .and_then(|scaled| scaled.checked_div(steps))
                .and_then(|ms| i64::try_from(ms).ok())
                .ok_or(GenerationError::TimestampOutOfRange)?;
            start
                .checked_add_signed(TimeDelta::milliseconds(offset))
                .ok_or(GenerationError::TimestampOutOfRange)
        })
        .collect()
}

fn to_i128(value: usize) -> Result<i128, GenerationError> {
    u64::try_from(value)
        .map(i128::from)
        .map_err(|_| GenerationError::TimestampOutOfRange)
}
