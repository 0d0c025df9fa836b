//! Row structs matching the database schema.

pub mod job;
