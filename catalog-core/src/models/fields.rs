use serde_json::Value;

type Inner = indexmap::IndexMap<String, Value, rustc_hash::FxBuildHasher>;

/// An open map of field names to JSON values, with deterministic ordering.
///
/// Reviews, patches and filters carry one of these (flattened into the
/// surrounding object) for fields the typed structures do not know about.
/// Predictable ordering keeps the serialized document stable, so that an
/// update that changes nothing also writes nothing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldMap(Inner);

impl FieldMap {
    /// Set `name` to `value`, reporting whether the stored value changed.
    pub fn assign(&mut self, name: &str, value: &Value) -> bool {
        match self.0.get_mut(name) {
            Some(current) if *current == *value => false,
            Some(current) => {
                *current = value.clone();
                true
            }
            None => {
                self.0.insert(name.to_owned(), value.clone());
                true
            }
        }
    }

    /// Whether the value stored under `name` equals `value`.
    ///
    /// A missing field compares equal to `null`.
    pub fn holds(&self, name: &str, value: &Value) -> bool {
        self.0.get(name).unwrap_or(&Value::Null) == value
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for FieldMap {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> std::borrow::Cow<'static, str> {
        "FieldMap".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "object",
            "additionalProperties": true,
        })
    }
}

impl std::ops::Deref for FieldMap {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for FieldMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
