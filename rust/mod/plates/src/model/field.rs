use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An optional record field that remembers *how* it was missing.
///
/// `Absent` fields are skipped on output, `Null` fields are written as
/// `null`, so a document read from disk is written back byte-for-byte
/// equivalent. Use with
/// `#[serde(default, skip_serializing_if = "OptionalField::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalField<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for OptionalField<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> OptionalField<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T> From<Option<T>> for OptionalField<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Value(v),
            None => Self::Absent,
        }
    }
}

impl<T: Serialize> Serialize for OptionalField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OptionalField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key is present; a missing key goes through
        // `#[serde(default)]` and stays `Absent`.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "OptionalField::is_absent")]
        note: OptionalField<String>,
    }

    #[test]
    fn absent_null_and_value_survive_roundtrip() {
        for json in [r#"{}"#, r#"{"note":null}"#, r#"{"note":"x"}"#] {
            let h: Holder = serde_json::from_str(json).unwrap();
            assert_eq!(serde_json::to_string(&h).unwrap(), json);
        }
    }

    #[test]
    fn accessors() {
        let v: OptionalField<u32> = Some(3).into();
        assert!(v.is_set());
        assert_eq!(v.as_option(), Some(&3));

        let n: OptionalField<u32> = OptionalField::Null;
        assert!(!n.is_absent());
        assert_eq!(n.into_option(), None);

        let a: OptionalField<u32> = None.into();
        assert!(a.is_absent());
    }
}
