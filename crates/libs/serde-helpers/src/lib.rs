use serde::de::Deserializer;
use serde::Deserialize;
use std::time::Duration;

/// Deserializes a duration expressed in milliseconds.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms: u64 = Deserialize::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct WithTimeout {
        #[serde(deserialize_with = "deserialize_duration")]
        timeout: Duration,
    }

    #[test]
    fn milliseconds_become_durations() {
        let parsed: WithTimeout = serde_json::from_str(r#"{"timeout": 1500}"#).unwrap();
        assert_eq!(parsed.timeout, Duration::from_millis(1500));
    }
}
