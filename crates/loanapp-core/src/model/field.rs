use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

/// Presence of one section key in an inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// Key not supplied at all
    Absent,
    /// Key supplied as `null`, `{}` or `[]`
    Empty,
    /// Key supplied with content
    Set,
}

/// Tri-state payload value
///
/// Distinguishes a key that is missing from one that is present but empty,
/// which `Option<T>` cannot. Use together with `#[serde(default)]` so a
/// missing key lands on `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Empty,
    Set(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn state(&self) -> FieldState {
        match self {
            Field::Absent => FieldState::Absent,
            Field::Empty => FieldState::Empty,
            Field::Set(_) => FieldState::Set,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_set(self) -> Option<T> {
        match self {
            Field::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Field<Vec<T>> {
    /// Elements of a collection payload; empty unless the key is `Set`
    pub fn items(&self) -> &[T] {
        match self {
            Field::Set(items) => items,
            _ => &[],
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    /// `None` maps to `Empty`: the caller chose to send the key.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Set(v),
            None => Field::Empty,
        }
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(Field::Empty),
            Some(Value::Object(map)) if map.is_empty() => Ok(Field::Empty),
            Some(Value::Array(items)) if items.is_empty() => Ok(Field::Empty),
            Some(value) => serde_json::from_value(value)
                .map(Field::Set)
                .map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Doc {
        #[serde(default)]
        names: Field<Vec<String>>,
        #[serde(default)]
        section: Field<serde_json::Map<String, Value>>,
    }

    #[test]
    fn test_missing_key_is_absent() {
        let doc: Doc = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.names.state(), FieldState::Absent);
        assert_eq!(doc.section.state(), FieldState::Absent);
    }

    #[test]
    fn test_null_and_empty_containers_are_empty() {
        let doc: Doc = serde_json::from_str(r#"{"names": [], "section": null}"#).unwrap();
        assert_eq!(doc.names.state(), FieldState::Empty);
        assert_eq!(doc.section.state(), FieldState::Empty);

        let doc: Doc = serde_json::from_str(r#"{"names": null, "section": {}}"#).unwrap();
        assert_eq!(doc.names.state(), FieldState::Empty);
        assert_eq!(doc.section.state(), FieldState::Empty);
    }

    #[test]
    fn test_content_is_set() {
        let doc: Doc = serde_json::from_str(r#"{"names": ["A", "B"]}"#).unwrap();
        assert_eq!(doc.names.items(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let result: Result<Doc, _> = serde_json::from_str(r#"{"names": {"a": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_items_of_non_set_collection_is_empty() {
        let field: Field<Vec<u8>> = Field::Empty;
        assert!(field.items().is_empty());
        assert!(Field::<Vec<u8>>::Absent.items().is_empty());
    }
}
