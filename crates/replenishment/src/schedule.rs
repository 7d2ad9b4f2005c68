//! Next-delivery-date calculation.
//!
//! Each location carries a configured delivery weekday; the next delivery is
//! the first occurrence of that weekday strictly after `today` (same-day
//! never counts, so the result is 1..=7 days out).

use chrono::{Datelike, Days, NaiveDate, Weekday};

use aquaflow_core::{DomainError, DomainResult};

/// Parse a configured delivery day.
///
/// Exactly the seven full English day names are recognized,
/// case-insensitively; anything else is invalid input.
pub fn parse_delivery_day(name: &str) -> DomainResult<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "sunday" => Ok(Weekday::Sun),
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        other => Err(DomainError::validation(format!(
            "invalid delivery day '{other}'"
        ))),
    }
}

/// Compute the next delivery date for a configured weekday name.
pub fn next_delivery_date(delivery_day: &str, today: NaiveDate) -> DomainResult<NaiveDate> {
    let target = parse_delivery_day(delivery_day)?;

    let target_index = i64::from(target.num_days_from_sunday());
    let today_index = i64::from(today.weekday().num_days_from_sunday());

    let mut days_to_add = target_index - today_index;
    if days_to_add <= 0 {
        days_to_add += 7;
    }

    today
        .checked_add_days(Days::new(days_to_add as u64))
        .ok_or_else(|| DomainError::validation("delivery date out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-06-02 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn same_weekday_rolls_to_next_week() {
        let next = next_delivery_date("monday", monday()).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!((next - monday()).num_days(), 7);
    }

    #[test]
    fn later_weekday_lands_in_same_week() {
        let next = next_delivery_date("Wednesday", monday()).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        assert_eq!((next - monday()).num_days(), 2);
    }

    #[test]
    fn earlier_weekday_lands_in_next_week() {
        let next = next_delivery_date("sunday", monday()).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        assert_eq!((next - monday()).num_days(), 6);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(parse_delivery_day("SATURDAY").unwrap(), Weekday::Sat);
        assert_eq!(parse_delivery_day("Friday").unwrap(), Weekday::Fri);
    }

    #[test]
    fn unknown_day_name_is_invalid_input() {
        assert!(matches!(
            next_delivery_date("bogusday", monday()),
            Err(DomainError::Validation(_))
        ));
        // abbreviations are not recognized values
        assert!(parse_delivery_day("mon").is_err());
    }

    #[test]
    fn result_is_always_within_seven_days_and_never_same_day() {
        let days = [
            "sunday",
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
        ];
        let mut today = monday();
        for _ in 0..7 {
            for day in days {
                let next = next_delivery_date(day, today).unwrap();
                let delta = (next - today).num_days();
                assert!((1..=7).contains(&delta), "{day} from {today} gave {delta}");
                assert_eq!(next.weekday(), parse_delivery_day(day).unwrap());
            }
            today = today.succ_opt().unwrap();
        }
    }
}
