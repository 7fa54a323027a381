//! Lenient decoding helpers for backend payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// Treat `null` like a missing field
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Assignees arrive either as bare ids or as populated user objects
pub fn assignee_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AssigneeRef {
        Id(String),
        User {
            #[serde(rename = "_id", alias = "id")]
            id: String,
        },
    }

    let refs: Option<Vec<AssigneeRef>> = Option::deserialize(deserializer)?;
    Ok(refs
        .unwrap_or_default()
        .into_iter()
        .map(|r| match r {
            AssigneeRef::Id(id) => id,
            AssigneeRef::User { id } => id,
        })
        .collect())
}

/// Due dates: full ISO timestamps or plain dates in, plain dates out
pub mod due_date {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

/// Parse the date part of `2024-05-01` or `2024-05-01T10:00:00.000Z`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
