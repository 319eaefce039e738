//! Modules layer - Infrastructure components shared by features
//!
//! Contains the codec used to store file content inside the database.

pub mod blob;
