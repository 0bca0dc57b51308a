//! # Type Registry
//!
//! Encodes domain objects into JSON objects tagged with a type marker and
//! decodes them back:
//!
//! ```json
//! {"PlayerModel": true, "first_name": "Jack", "technique": 52, ...}
//! ```
//!
//! The registry is an explicit value; callers build one (usually with
//! [`Registry::with_domain_types`]) and pass it where decoding happens.
//!
//! ## Usage
//! ```rust
//! use league_core::player::{PlayerModel, Surface};
//! use league_core::serialization::Registry;
//!
//! let registry = Registry::with_domain_types();
//! let player = PlayerModel::new("Jack", "Ben", "Reid", 52, 48, 17, Surface::Clay);
//! let value = registry.encode(&player).unwrap();
//! assert_eq!(value["PlayerModel"], true);
//! let decoded: PlayerModel = registry.decode(value).unwrap();
//! assert_eq!(decoded, player);
//! ```

use std::any::Any;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::club::{Club, PlayerSlot};
use crate::game::Game;
use crate::player::PlayerModel;

/// A type the registry can encode and decode.
pub trait Jsonable: Serialize + DeserializeOwned + 'static {
    /// Marker key written next to the fields.
    const TYPE_NAME: &'static str;
}

impl Jsonable for PlayerModel {
    const TYPE_NAME: &'static str = "PlayerModel";
}

impl Jsonable for PlayerSlot {
    const TYPE_NAME: &'static str = "PlayerSlot";
}

impl Jsonable for Club {
    const TYPE_NAME: &'static str = "Club";
}

impl Jsonable for Game {
    const TYPE_NAME: &'static str = "Game";
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Type {type_name} is not registered")]
    Unregistered { type_name: &'static str },

    #[error("{type_name} is not encoded as a JSON object")]
    NotAnObject { type_name: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unknown type marker: {type_name}")]
    UnknownType { type_name: String },

    #[error("Object has no type marker")]
    MissingMarker,

    #[error("Expected {expected}, found {found}")]
    WrongType { expected: &'static str, found: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type Constructor = fn(Value) -> Result<Box<dyn Any>, serde_json::Error>;

fn construct<T: Jsonable>(value: Value) -> Result<Box<dyn Any>, serde_json::Error> {
    let decoded: T = serde_json::from_value(value)?;
    Ok(Box::new(decoded))
}

/// Type name to constructor map.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry knowing every persisted domain type.
    pub fn with_domain_types() -> Self {
        let mut registry = Self::new();
        registry.register::<PlayerModel>();
        registry.register::<PlayerSlot>();
        registry.register::<Club>();
        registry.register::<Game>();
        registry
    }

    pub fn register<T: Jsonable>(&mut self) {
        self.constructors.insert(T::TYPE_NAME, construct::<T>);
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Field map of `value` plus its `{TypeName: true}` marker.
    pub fn encode<T: Jsonable>(&self, value: &T) -> Result<Value, EncodeError> {
        if !self.is_registered(T::TYPE_NAME) {
            return Err(EncodeError::Unregistered { type_name: T::TYPE_NAME });
        }
        match serde_json::to_value(value)? {
            Value::Object(mut fields) => {
                fields.insert(T::TYPE_NAME.to_string(), Value::Bool(true));
                Ok(Value::Object(fields))
            }
            _ => Err(EncodeError::NotAnObject { type_name: T::TYPE_NAME }),
        }
    }

    /// Decodes a marked object into `T`.
    pub fn decode<T: Jsonable>(&self, value: Value) -> Result<T, DecodeError> {
        let found = self.marker_of(&value)?;
        if found != T::TYPE_NAME {
            return Err(DecodeError::WrongType { expected: T::TYPE_NAME, found });
        }
        let mut value = value;
        self.strip_markers(&mut value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes a marked object into whatever type its marker names.
    pub fn decode_any(&self, value: Value) -> Result<Box<dyn Any>, DecodeError> {
        let type_name = self.marker_of(&value)?;
        let constructor = self
            .constructors
            .get(type_name.as_str())
            .ok_or(DecodeError::UnknownType { type_name })?;
        let mut value = value;
        self.strip_markers(&mut value)?;
        Ok(constructor(value)?)
    }

    /// Removes markers from every nested object.
    ///
    /// A key set to `true` whose name starts with an uppercase letter is a
    /// marker; it must name a registered type.
    pub fn strip_markers(&self, value: &mut Value) -> Result<(), DecodeError> {
        match value {
            Value::Object(fields) => {
                for type_name in markers(fields) {
                    if !self.is_registered(&type_name) {
                        return Err(DecodeError::UnknownType { type_name });
                    }
                    fields.remove(&type_name);
                }
                fields.values_mut().try_for_each(|field| self.strip_markers(field))
            }
            Value::Array(items) => items.iter_mut().try_for_each(|item| self.strip_markers(item)),
            _ => Ok(()),
        }
    }

    fn marker_of(&self, value: &Value) -> Result<String, DecodeError> {
        let Value::Object(fields) = value else {
            return Err(DecodeError::MissingMarker);
        };
        markers(fields).into_iter().next().ok_or(DecodeError::MissingMarker)
    }
}

fn is_marker(key: &str, value: &Value) -> bool {
    value == &Value::Bool(true) && key.starts_with(|c: char| c.is_ascii_uppercase())
}

fn markers(fields: &Map<String, Value>) -> Vec<String> {
    fields
        .iter()
        .filter(|(key, value)| is_marker(key, value))
        .map(|(key, _)| key.clone())
        .collect()
}
