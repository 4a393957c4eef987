use once_cell::sync::Lazy;
use regex::Regex;

use super::FieldError;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

/// ドット区切りのローカル部と、英数字で始まり英数字で終わるラベルのドメイン
static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ))
    .expect("email address pattern")
});

const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"));

pub(super) const NAME_MIN_LENGTH: usize = 2;
pub(super) const PARTY_MIN: u32 = 1;

pub(super) fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

pub(super) fn min_length(value: &str, required: usize) -> Option<FieldError> {
    let actual = value.chars().count();
    (!value.is_empty() && actual < required).then_some(FieldError::MinLength { required, actual })
}

pub(super) fn email(value: &str) -> Option<FieldError> {
    (!value.is_empty() && !is_email(value)).then_some(FieldError::Email)
}

fn is_email(value: &str) -> bool {
    let local_length = value.split('@').next().map_or(0, str::len);
    value.len() <= EMAIL_MAX_LENGTH
        && local_length <= EMAIL_LOCAL_MAX_LENGTH
        && EMAIL_ADDRESS.is_match(value)
        && EMAIL.is_match(value)
}

pub(super) fn phone(value: &str) -> Option<FieldError> {
    (!value.is_empty() && !PHONE.is_match(value)).then_some(FieldError::Phone)
}

pub(super) fn bounded(value: Option<u32>, min: u32, max: Option<u32>) -> Option<FieldError> {
    let actual = match value {
        Some(actual) => actual,
        None => return Some(FieldError::Required),
    };
    if actual < min {
        return Some(FieldError::Min { min, actual });
    }
    match max {
        Some(max) if actual > max => Some(FieldError::Max { max, actual }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert_eq!(email("invalid-email"), Some(FieldError::Email));
        assert_eq!(email("valid@email.com"), None);
        assert_eq!(email("first.last+tag@sub.example.co"), None);
        assert_eq!(email("a@b.c"), Some(FieldError::Email));
        assert_eq!(email(""), None);
    }

    #[test]
    fn test_email_rejects_malformed_dots_and_labels() {
        for value in [
            "a..b@example.com",
            ".a@example.com",
            "a.@example.com",
            "user@example..com",
            "user@-example.com",
            "user@example-.com",
            "user@.example.com",
        ] {
            assert_eq!(email(value), Some(FieldError::Email), "{value}");
        }
        assert_eq!(email("a.b@my-example.com"), None);
    }

    #[test]
    fn test_email_length_limits() {
        let local = "a".repeat(65);
        assert_eq!(email(&format!("{local}@example.com")), Some(FieldError::Email));
        let domain = format!("{}.com", ["abcdefghij"; 25].join("."));
        assert_eq!(email(&format!("user@{domain}")), Some(FieldError::Email));
        assert_eq!(email(&format!("{}@example.com", "a".repeat(64))), None);
    }

    #[test]
    fn test_phone_format() {
        assert_eq!(phone("123"), Some(FieldError::Phone));
        assert_eq!(phone("1234567890"), None);
        assert_eq!(phone("123-456-7890"), Some(FieldError::Phone));
        assert_eq!(phone("+11234567890"), Some(FieldError::Phone));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert_eq!(
            min_length("A", NAME_MIN_LENGTH),
            Some(FieldError::MinLength {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(min_length("佐藤", NAME_MIN_LENGTH), None);
        assert_eq!(min_length("", NAME_MIN_LENGTH), None);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(None, 1, Some(12)), Some(FieldError::Required));
        assert_eq!(
            bounded(Some(0), 1, Some(12)),
            Some(FieldError::Min { min: 1, actual: 0 })
        );
        assert_eq!(
            bounded(Some(13), 1, Some(12)),
            Some(FieldError::Max { max: 12, actual: 13 })
        );
        assert_eq!(bounded(Some(12), 1, Some(12)), None);
        assert_eq!(bounded(Some(40), 0, None), None);
    }
}
