//! Small shared services: stable point ids and object storage for exports.

pub mod storage;
pub mod uuid;
