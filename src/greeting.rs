//! Time-of-day greeting shown on the landing page

use chrono::Timelike;

/// How the assistant addresses the user
pub const USER_NAME: &str = "Sir";

/// Greeting for an hour of the day (0-23)
///
/// Morning runs 05:00-11:59, afternoon 12:00-17:59, evening otherwise.
#[must_use]
pub fn greeting_for_hour(hour: u32) -> String {
    let part = match hour {
        5..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    };
    format!("Good {part}, {USER_NAME}!")
}

/// Greeting for a point in time
#[must_use]
pub fn greeting_at(time: &impl Timelike) -> String {
    greeting_for_hour(time.hour())
}

/// Greeting for the server's local time
#[must_use]
pub fn current_greeting() -> String {
    greeting_at(&chrono::Local::now())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn at(h: u32, m: u32) -> String {
        greeting_at(&NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(at(4, 59), "Good evening, Sir!");
        assert_eq!(at(5, 0), "Good morning, Sir!");
        assert_eq!(at(11, 59), "Good morning, Sir!");
        assert_eq!(at(12, 0), "Good afternoon, Sir!");
        assert_eq!(at(17, 59), "Good afternoon, Sir!");
        assert_eq!(at(18, 0), "Good evening, Sir!");
    }

    #[test]
    fn midnight_is_evening() {
        assert_eq!(greeting_for_hour(0), "Good evening, Sir!");
        assert_eq!(greeting_for_hour(23), "Good evening, Sir!");
    }
}
