//! Structured document loading shared by all content parsers

use crate::error::{ContentError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a YAML document into its typed representation.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_yaml::from_str(&text).map_err(|source| ContentError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON document into its typed representation.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn required(value: Option<String>, path: &Path, field: &'static str) -> Result<String> {
    value.ok_or_else(|| ContentError::MissingField {
        path: path.to_path_buf(),
        field,
    })
}

/// Lenient field deserializers. Content files are hand-edited and ids are
/// not always quoted, so scalars of any type are read as strings.
pub(crate) mod lenient {
    use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
    use serde::Deserialize;
    use std::fmt;
    use std::marker::PhantomData;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(s: Scalar) -> Self {
            match s {
                Scalar::Str(s) => s,
                Scalar::Int(i) => i.to_string(),
                Scalar::UInt(u) => u.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    /// Optional scalar as a string; `null` and `""` both read as `None`.
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Scalar>::deserialize(deserializer)?;
        Ok(value.map(String::from).filter(|s| !s.is_empty()))
    }

    /// Values of a mapping in document order; keys are ignored and `null`
    /// reads as empty.
    pub fn map_values<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        struct ValuesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ValuesVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, value)) = map.next_entry::<IgnoredAny, T>()? {
                    out.push(value);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_any(ValuesVisitor(PhantomData))
    }
}
