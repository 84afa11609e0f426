use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker substituted for every secret value that reaches a log record.
pub const REDACTION_MARKER: &str = "****";

/// A wrapper for values that must never appear in log output.
///
/// Every rendering path yields [`REDACTION_MARKER`]: `Display` (what `tracing`
/// records for `field = %secret`), `Debug` (what it records for
/// `field = ?secret`) and `Serialize` (what structured encoders see). Covering
/// all three keeps the value hidden no matter which one a consumer picks.
///
/// # Examples
///
/// ```
/// use logwire::Secret;
///
/// let password = Secret::new("admin");
/// assert_eq!(password.to_string(), "****");
/// assert_eq!(format!("{:?}", password), "****");
/// assert_eq!(*password.expose_secret(), "admin");
///
/// tracing::debug!(username = "ram", password = %password, "read userinfo from db");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Secret<T> {
    value: T,
}

impl<T> Secret<T> {
    /// Create a new Secret wrapping the given value.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Expose the secret value.
    ///
    /// Deliberately verbose so that access is easy to spot in review. Never
    /// pass the result to a logging call.
    pub fn expose_secret(&self) -> &T {
        &self.value
    }

    /// Maps a `Secret<T>` to `Secret<U>` by applying a function to the contained value.
    ///
    /// ```
    /// use logwire::Secret;
    ///
    /// let port = Secret::new("8080".to_string()).map(|s| s.parse::<u16>().unwrap());
    /// assert_eq!(*port.expose_secret(), 8080);
    /// assert_eq!(port.to_string(), "****");
    /// ```
    pub fn map<U, F>(self, f: F) -> Secret<U>
    where
        F: FnOnce(T) -> U,
    {
        Secret::new(f(self.value))
    }
}

impl From<&SecretString> for Secret<String> {
    fn from(secret: &SecretString) -> Self {
        Secret::new(secret.expose_secret().to_string())
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTION_MARKER)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTION_MARKER)
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTION_MARKER)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Secret::new)
    }
}
