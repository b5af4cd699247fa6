//! Web-facing types. This crate exposes DTOs and the response envelope only
//! — wiring them to an HTTP router is the embedding binary's job.

pub mod dto;
