// src/handlers/mod.rs

pub mod auth;
pub mod exam;
pub mod home;
pub mod result;
pub mod submission;
