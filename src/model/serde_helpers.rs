// src/model/serde_helpers.rs
//! Lenient serde adapters for upstream scalar encodings.

pub(super) mod status_code {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStatus {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(status: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*status)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match RawStatus::deserialize(deserializer)? {
            RawStatus::Number(n) => Ok(n),
            RawStatus::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid status code: {}", text))),
        }
    }
}

pub(super) mod instant {
    use crate::types::{format_instant, parse_instant};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        instant: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_instant(*instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_instant(&text).map_err(serde::de::Error::custom)
    }
}

pub(super) mod optional_instant {
    use crate::types::{format_instant, parse_instant};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        instant: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match instant {
            Some(instant) => serializer.serialize_str(&format_instant(*instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        // Some tenants send "" rather than null for never-updated orders
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => parse_instant(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
