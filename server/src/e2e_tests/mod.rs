//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router over a
//! fresh in-memory store.

#![cfg(test)]

mod helpers;

mod test_concurrent_logins;
mod test_health;
mod test_login;
mod test_register;
