//! # Fava Auth
//!
//! A single-admin login gate. Credentials come from a JSON secrets file
//! (`data/secrets.json` by default) holding a secret key and the salted SHA-256
//! digests of the admin username and password. The server exposes:
//!
//! - `GET/POST /login`: the login form, rate limited to 3 requests per hour per client.
//! - `GET /logout`: ends the current session; anonymous callers are sent to `/login`.
//! - `GET /` and `GET /health`.
//!
//! Sessions live in memory and end when the process stops.

pub mod cli;
pub mod fava;
pub mod secrets;
