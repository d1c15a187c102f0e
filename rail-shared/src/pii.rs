use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Wrapper for personal data (phone, e-mail, document numbers).
///
/// `Debug` and `Display` print a mask so the value never reaches log output,
/// while serialization writes the real value for API responses.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Deref for Masked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let phone = Masked("+7 999 123 45 67".to_string());
        assert_eq!(format!("{:?}", phone), "********");
        assert_eq!(format!("{}", phone), "********");
        assert_eq!(phone.len(), 16);
    }

    #[test]
    fn test_serializes_real_value() {
        let email = Masked("inbox@mail.ru".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"inbox@mail.ru\"");

        let back: Masked<String> = serde_json::from_str("\"a@b.cd\"").unwrap();
        assert_eq!(back.into_inner(), "a@b.cd");
    }
}
