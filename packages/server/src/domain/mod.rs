//! Domain layer for the chat server.
//!
//! This module contains the rules about names and participants that are
//! independent of sockets and the reactor.

pub mod entity;
pub mod error;
pub mod factory;
pub mod value_object;

pub use entity::{Participant, roster, sort_participants};
pub use error::{RegistryError, ValueObjectError};
pub use factory::GuestNameFactory;
pub use value_object::{MAX_NICKNAME_LENGTH, MessageText, Nickname, Timestamp};
