use serde::{Deserialize, Serialize};

/// A city as returned by the autocomplete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

impl City {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_accepts_backend_id_key() {
        let city: City = serde_json::from_str(r#"{"_id": "c1", "name": "москва"}"#).unwrap();
        assert_eq!(city, City::new("c1", "москва"));

        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["id"], "c1");
    }
}
