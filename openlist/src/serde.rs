use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// The server is written in Go, where an empty slice happily serializes
/// as `null`. Treat `null` as the default value instead.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamp that may be missing, `null` or an empty string.
pub(crate) struct OptDateTime;

impl<'de> DeserializeAs<'de, Option<DateTime<FixedOffset>>> for OptDateTime {
    fn deserialize_as<D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty());

        match s {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map_err(serde::de::Error::custom)
                .map(Some),
            None => Ok(None),
        }
    }
}

impl SerializeAs<Option<DateTime<FixedOffset>>> for OptDateTime {
    fn serialize_as<S>(source: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match source {
            Some(datetime) => serializer.serialize_str(&datetime.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}
