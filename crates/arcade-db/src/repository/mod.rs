//! Repository layer — read-only query functions organized by domain.

pub mod domains;
pub mod projects;
pub mod versions;
