// Life of a request:
// 1. Protobuf frame comes in over the WebSocket
// 2. Convert / validate proto into internal request format
// 3. Run the matching AuthService operation under the request deadline:
//     - Register: hash password, save user
//     - Login: look up user, verify password, resolve app, sign token
//     - IsAdmin: look up admin flag
// 4. Map the outcome onto a google.rpc.Status and respond
//
// System components:
//  - User / app stores (in memory)
//  - Argon2 password hasher
//  - Per-app JWT issuer

pub mod auth;
pub mod client_connection;
pub mod config;
pub mod proto;
pub mod socket;
pub mod storage;
pub mod time;
pub mod types;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use client_connection::ClientConnection;
