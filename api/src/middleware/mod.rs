//! Request extractors guarding protected routes

pub mod auth;
