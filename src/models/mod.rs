// src/models/mod.rs

pub mod exam;
pub mod exam_result;
pub mod question;
pub mod user;
