use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Success envelope wrapping every response payload
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Kind of principal the client acts as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Device,
}

/// Authenticated user session
#[derive(Debug, Clone)]
pub struct Session {
    /// Value sent verbatim in the `Authorization` header
    pub token: SecretString,
    /// Entity the session belongs to
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthData {
    pub header: String,
    #[serde(default)]
    pub owner_entity_id: Option<String>,
}

/// Device registered on the platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_service_id: Option<String>,
    #[serde(default)]
    pub gateway_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One-time code a device presents to be bound to a user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationCode {
    pub code: String,
    pub secret: String,
}

/// Device access token
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub secret: Option<SecretString>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub owner_entity_id: Option<String>,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Value to send in the `Authorization` header
    pub header: SecretString,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenData {
    pub access_token: AccessToken,
}

/// Owner class of a key-value storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StorageContainer {
    /// Storage of a user within the current service
    Users,
    Devices,
    Services,
}

impl StorageContainer {
    /// URL path segments preceding the owner id
    pub const fn path_segments(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["services", "current", "users"],
            Self::Devices => &["devices"],
            Self::Services => &["services"],
        }
    }
}

/// Visibility scope of a key-value storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    /// Only visible to the owning service
    Local,
    Public,
}

/// Group of key-value pairs
pub type KvGroup = Map<String, Value>;

/// Behaviour when creating a resource that may already exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CreationMode {
    #[default]
    OverwriteIfExists,
    SkipIfExactlyExists,
    ErrorIfExists,
}

/// Command queue attached to a device
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandQueue {
    pub name: String,
    #[serde(default)]
    pub first_key: Option<String>,
    #[serde(default)]
    pub last_key: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub owner_entity_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Lifecycle state of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommandState {
    Queued,
    Acquired,
    Executed,
    Rejected,
    Expired,
    Failed,
}

/// Command placed in a queue
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Command {
    pub id: String,
    pub command: String,
    pub state: CommandState,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(rename = "command_result", default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub state_changed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCommand<'a, T> {
    pub command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a T>,
}

/// Key type of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SequenceType {
    Datetime,
    Integer,
    Real,
}

/// Ordered data series attached to a device
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sequence {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SequenceType,
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Bounds of a ranged sequence read
///
/// Either `from`/`to` or `centre`/`radius` select the span; unset fields are
/// left out of the request. `keys` narrows the read to those item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

impl ItemRange {
    /// Items between two keys, both inclusive
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    /// Items within `radius` of `centre`
    pub fn around(centre: impl Into<String>, radius: impl Into<String>) -> Self {
        Self {
            centre: Some(centre.into()),
            radius: Some(radius.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Command id bounds of a ranged command read: a segment or a ray
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRange {
    /// Commands from this id onwards
    From(String),
    /// Commands up to this id
    To(String),
    Between(String, String),
}

impl CommandRange {
    pub(crate) fn bounds(&self) -> CommandBounds<'_> {
        match self {
            Self::From(from) => CommandBounds {
                from: Some(from),
                to: None,
            },
            Self::To(to) => CommandBounds { from: None, to: Some(to) },
            Self::Between(from, to) => CommandBounds {
                from: Some(from),
                to: Some(to),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CommandBounds<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<&'a str>,
}

/// Resource a trigger is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TriggerContainer {
    Sequences,
    CommandQueues,
}

/// Template a trigger was instantiated from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerTemplate {
    pub name: String,
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Trigger attached to a sequence or command queue
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trigger {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub parameter_values: HashMap<String, Value>,
    #[serde(default)]
    pub trigger: Option<TriggerTemplate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValueBody<'a, T> {
    pub value: &'a T,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValuesBody<'a, T> {
    pub values: &'a T,
}

/// Bulk item update, optionally guarded by the values currently stored
#[derive(Debug, Serialize)]
pub(crate) struct ItemsPatch<'a> {
    pub values: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when_values: Option<&'a Map<String, Value>>,
}

/// Bulk item removal, optionally guarded by the values currently stored
#[derive(Debug, Serialize)]
pub(crate) struct ItemsDelete<'a> {
    pub keys: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when_values: Option<&'a Map<String, Value>>,
}
