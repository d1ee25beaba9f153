use std::fmt;

pub const MAX_REVIEW_CHARS: usize = 5000;

/// A review as submitted by a client, before any checks.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub rating: i32,
    pub review_text: String,
}

/// A submission that passed validation; `review_text` is trimmed.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub rating: i32,
    pub review_text: String,
}

/// Client-caused rejection. Kept as a concrete error type so callers can
/// downcast it out of an `anyhow::Error` and answer with a 400 instead of
/// a generic processing failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid review: {}", self.reason)
    }
}

impl std::error::Error for ValidationError {}

impl ReviewSubmission {
    pub fn validate(self) -> Result<ValidatedSubmission, ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::new("rating must be between 1 and 5"));
        }

        let review_text = self.review_text.trim().to_string();
        if review_text.is_empty() {
            return Err(ValidationError::new("review text cannot be empty"));
        }

        if review_text.chars().count() > MAX_REVIEW_CHARS {
            return Err(ValidationError::new(format!(
                "review text is too long (max {MAX_REVIEW_CHARS} characters)"
            )));
        }

        Ok(ValidatedSubmission {
            rating: self.rating,
            review_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(rating: i32, text: &str) -> ReviewSubmission {
        ReviewSubmission {
            rating,
            review_text: text.to_string(),
        }
    }

    #[test]
    fn accepts_all_valid_ratings() {
        for rating in 1..=5 {
            let v = submission(rating, "solid meal").validate().unwrap();
            assert_eq!(v.rating, rating);
        }
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for rating in [0, 6, -1, 100] {
            assert!(submission(rating, "text").validate().is_err());
        }
    }

    #[test]
    fn trims_review_text() {
        let v = submission(4, "  great service  ").validate().unwrap();
        assert_eq!(v.review_text, "great service");
    }

    #[test]
    fn rejects_whitespace_only_text() {
        assert!(submission(4, "   \n\t ").validate().is_err());
    }

    #[test]
    fn accepts_text_at_the_limit() {
        let text = "a".repeat(MAX_REVIEW_CHARS);
        assert!(submission(3, &text).validate().is_ok());
    }

    #[test]
    fn rejects_text_over_the_limit() {
        let text = "a".repeat(MAX_REVIEW_CHARS + 1);
        let err = submission(3, &text).validate().unwrap_err();
        assert!(err.reason.contains("too long"));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // Multibyte text under the char limit must pass.
        let text = "학".repeat(MAX_REVIEW_CHARS);
        assert!(submission(5, &text).validate().is_ok());
    }

    #[test]
    fn downcasts_out_of_anyhow() {
        let err: anyhow::Error = submission(9, "x").validate().unwrap_err().into();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }
}
