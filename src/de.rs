use serde::de::{Deserialize, Deserializer, Error};

/// Accept only the literal status `"OK"`, as returned by a healthy server's
/// ping endpoint.
pub fn only_ok<'a, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'a>,
{
    String::deserialize(deserializer).and_then(|s| {
        if s == "OK" {
            Ok(s)
        } else {
            Err(Error::custom(format!("invalid status: {}", s)))
        }
    })
}

#[test]
fn test_only_ok() {
    #[derive(Debug, PartialEq, Eq, serde::Deserialize)]
    struct T {
        #[serde(deserialize_with = "only_ok")]
        status: String,
    }

    assert_eq!(
        serde_json::from_str::<T>(r#"{"status": "OK"}"#).unwrap(),
        T {
            status: "OK".into()
        },
    );

    assert!(serde_json::from_str::<T>(r#"{"status": "UNHEALTHY"}"#).is_err());
    assert!(serde_json::from_str::<T>(r#"{"status": "ok"}"#).is_err());
}
