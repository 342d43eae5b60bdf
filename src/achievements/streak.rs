use chrono::{Days, NaiveDate};

/// Length of the run of consecutive days ending at `today` that each have at
/// least one learning event.
///
/// Dates after `today` (clock skew) are ignored.
///
/// The run is anchored at `today`: without an event today the streak is 0,
/// however long the run up to yesterday was. Dates may arrive in any order and
/// contain duplicates.
#[must_use]
pub fn daily_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut sorted: Vec<NaiveDate> = dates.iter().copied().filter(|d| *d <= today).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut streak = 0u32;
    for date in sorted {
        let Some(expected) = today.checked_sub_days(Days::new(u64::from(streak))) else {
            break;
        };

        if date == expected {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}
