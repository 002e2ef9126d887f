use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the backing store.
///
/// json-server style stores hand out either numbers or strings, so both are
/// accepted on the wire and kept as text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "RawToyId")]
pub struct ToyId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToyId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawToyId> for ToyId {
    fn from(raw: RawToyId) -> Self {
        match raw {
            RawToyId::Text(s) => ToyId(s),
            RawToyId::Number(n) => ToyId(n.to_string()),
        }
    }
}

impl ToyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ToyId {
    fn from(s: String) -> Self {
        ToyId(s)
    }
}

impl From<&str> for ToyId {
    fn from(s: &str) -> Self {
        ToyId(s.to_string())
    }
}

impl fmt::Display for ToyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Toy {
    pub id: ToyId,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub likes: u64,
}

/// Body of the create request. Always starts with zero likes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewToy {
    pub name: String,
    pub image: String,
    pub likes: u64,
}

impl NewToy {
    pub fn from_form(form: &ToyForm) -> Self {
        Self {
            name: form.name.clone(),
            image: form.image.clone(),
            likes: 0,
        }
    }
}

/// Body of the partial update sent for a like.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikesUpdate {
    pub likes: u64,
}

/// Values of the create form's `name` and `image` inputs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ToyForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

impl ToyForm {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.image.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toy_id_accepts_numbers_and_strings() {
        let numeric: Toy =
            serde_json::from_value(json!({"id": 3, "name": "Woody", "image": "w.png", "likes": 5}))
                .unwrap();
        assert_eq!(numeric.id.as_str(), "3");

        let text: Toy =
            serde_json::from_value(json!({"id": "a1b2", "name": "Rex", "image": "r.png", "likes": 0}))
                .unwrap();
        assert_eq!(text.id, ToyId::from("a1b2"));
    }

    #[test]
    fn missing_likes_defaults_to_zero() {
        let toy: Toy =
            serde_json::from_value(json!({"id": "9", "name": "Slinky", "image": "s.png"})).unwrap();
        assert_eq!(toy.likes, 0);
    }

    #[test]
    fn new_toy_body_starts_at_zero_likes() {
        let body = NewToy::from_form(&ToyForm::new("Bear", "bear.png"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"name": "Bear", "image": "bear.png", "likes": 0})
        );
    }

    #[test]
    fn toy_id_serializes_as_plain_string() {
        let id = ToyId::from("7");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("7"));
    }
}
