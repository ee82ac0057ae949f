//! Entity lifecycle and collection queries built on the request primitive.

pub mod lifecycle;
pub mod queries;
