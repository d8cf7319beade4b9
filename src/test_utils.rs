//! Helpers shared across unit test modules.

pub mod serde {
    use std::fmt::Debug;

    /// Asserts a value survives a serde_json round trip unchanged.
    pub fn assert_round_trip_eq<T>(value: &T)
    where
        T: ::serde::Serialize + ::serde::de::DeserializeOwned + PartialEq + Debug,
    {
        let json = serde_json::to_string(value).expect("value should serialize");
        let restored: T = serde_json::from_str(&json).expect("payload should deserialize");
        assert_eq!(restored, *value, "serde_json round trip altered {json}");
    }
}
