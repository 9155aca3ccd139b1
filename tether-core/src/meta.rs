use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map},
    fmt::{self, Display, Formatter},
};

/// Opaque context handed to [`Driver::acquire`](crate::Driver::acquire) and
/// [`Driver::release`](crate::Driver::release) without modification.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    entries: BTreeMap<Cow<'static, str>, String>,
}

impl Meta {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Cow<'static, str>, String> {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Meta
where
    K: Into<Cow<'static, str>>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Display for Meta {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut separate = false;
        for (k, v) in &self.entries {
            if separate {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v:?}")?;
            separate = true;
        }
        f.write_str("}")
    }
}
