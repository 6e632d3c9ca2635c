//! The `Product` entity.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Version assigned to every newly created product.
pub const INITIAL_VERSION: i32 = 1;

/// A catalog product.
///
/// The same shape is used on the wire and in storage. Every field is optional when
/// deserializing so that create/update payloads may omit `id` and `version`; missing
/// or `null` strings become `""` and missing or `null` integers become `0`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Product {
    /// Assigned by the repository on first save. `None` only for products that were
    /// never persisted.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
    /// Optimistic concurrency token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: i32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// A not-yet-persisted product at [`INITIAL_VERSION`].
    pub fn new(name: impl Into<String>, description: impl Into<String>, quantity: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            quantity,
            version: INITIAL_VERSION,
        }
    }

    /// A product with every field given, as loaded from storage.
    pub fn with_id(
        id: i32,
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: i32,
        version: i32,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: description.into(),
            quantity,
            version,
        }
    }

    /// Copies the client-editable fields of `payload` onto `self`.
    ///
    /// `id` is never touched. `version` is taken verbatim from the payload, it is not
    /// incremented.
    pub fn apply_update(&mut self, payload: Product) {
        self.name = payload.name;
        self.description = payload.description;
        self.quantity = payload.quantity;
        self.version = payload.version;
    }
}
