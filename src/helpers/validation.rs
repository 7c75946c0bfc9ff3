use crate::error::AppError;

/// A single constraint violation on a request field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects violations so a request reports all of them at once.
#[derive(Default, Debug)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn not_blank(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    pub fn check(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.add(field, message);
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Accepts `H:mm` or `HH:mm` with hours 0-23.
pub fn is_clock_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return false;
    }
    matches!(hours.parse::<u8>(), Ok(h) if h <= 23) && matches!(minutes.parse::<u8>(), Ok(m) if m <= 59)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_accepts_short_and_padded_hours() {
        for ok in ["9:30", "09:30", "00:00", "23:59"] {
            assert!(is_clock_time(ok), "{ok} should be accepted");
        }
    }

    #[test]
    fn clock_time_rejects_out_of_range_and_garbage() {
        for bad in ["24:00", "12:60", "12:5", "123:00", "noon", "", "12-30", "+1:30"] {
            assert!(!is_clock_time(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn violations_aggregate_in_order() {
        let mut v = Violations::new();
        v.not_blank("name", "  ", "Restaurant name is required");
        v.check(false, "rating", "Rating must be between 1 and 5");
        v.not_blank("content", "fine", "Review content is required");

        match v.into_result() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[1].field, "rating");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
