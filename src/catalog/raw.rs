//! Permissive serde shape of the persisted catalog.
//!
//! Every field is optional here so that a structurally incomplete catalog
//! still deserializes and `validate` can report all of its problems at once.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCatalog {
    #[serde(default)]
    pub notification: Vec<RawNotification>,

    #[serde(default)]
    pub site: Vec<RawSite>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNotification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSite {
    pub id: Option<String>,
    pub name: Option<String>,
    pub source: Option<OneOrMany<RawEndpoint>>,
    pub destination: Option<OneOrMany<RawEndpoint>>,

    #[serde(default, deserialize_with = "scalar_map")]
    pub params: BTreeMap<String, String>,

    #[serde(default)]
    pub flags: Vec<RawFlag>,

    #[serde(default)]
    pub filters: Vec<RawFilter>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEndpoint {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<String>,

    #[serde(default)]
    pub preserve_dir: bool,

    #[serde(default)]
    pub snapshot: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFlag {
    pub name: Option<String>,

    #[serde(default)]
    pub long: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub pattern: Option<String>,
}

/// Parameter values are strings, but `ssh_port = 22` is accepted too.
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(key, value)| (key, value.0)).collect())
}

/// A string, integer or boolean, kept in its textual form.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, integer or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A source/destination written either as a table or as an array of tables.
///
/// Only the single-table form is valid; accepting both lets validation
/// report "exactly one" instead of failing to parse. The visitor hands the
/// live map to `T` (no buffering) so unknown keys inside an endpoint still
/// reach `serde_ignored`.
#[derive(Debug, Clone)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
            type Value = OneOrMany<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table or an array of tables")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(de::value::MapAccessDeserializer::new(map)).map(OneOrMany::One)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                Vec::<T>::deserialize(de::value::SeqAccessDeserializer::new(seq))
                    .map(OneOrMany::Many)
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

impl<T> OneOrMany<T> {
    /// The single entry, if there is exactly one.
    pub fn single(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) if items.len() == 1 => items.first(),
            OneOrMany::Many(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let items: Vec<&T> = match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items.iter().collect(),
        };
        items.into_iter()
    }
}
