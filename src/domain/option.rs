use serde::{Deserialize, Serialize};

/// One selectable entry: an opaque value identifier plus its display label.
///
/// Upstream sources commonly ship the label under `name`; both spellings
/// deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(alias = "name")]
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_label_alias() {
        let opt: SelectOption = serde_json::from_str(r#"{"value":"a","name":"Alpha"}"#).unwrap();
        assert_eq!(opt, SelectOption::new("a", "Alpha"));
    }
}
