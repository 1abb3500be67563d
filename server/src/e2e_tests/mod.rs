//! End-to-end tests at the proto request/response level.
//!
//! Each test file covers a specific scenario, driving `ClientConnection`
//! with encoded-shape messages and checking the full response.

#![cfg(test)]


mod test_deadline;
mod test_is_admin;
mod test_login;
mod test_missing_fields;
mod test_register;
mod test_request_id;
mod test_scenario;
