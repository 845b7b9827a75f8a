//! Database models and request payloads for SecRest

pub mod privilege;

pub use privilege::{NewPrivilege, Privilege, PrivilegePayload};
