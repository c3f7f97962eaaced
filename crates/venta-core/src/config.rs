/// Environment-backed service configuration.
///
/// Each service defines a `Deserialize` struct for its env surface and gets
/// `from_env()` for free. Called once during startup.
///
/// # Panics
///
/// Panics when a required variable is absent or fails to parse; a service
/// with broken configuration should not come up at all.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }
}
