//! Validated client requests.
//!
//! Conversion from the wire form rejects empty credentials and zero ids so
//! the auth service only ever sees well-formed input.

use std::fmt;

use crate::{
    proto,
    types::{AppId, ProtoDeserializable, UserId},
};

pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub app_id: AppId,
}

pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

// Passwords never reach log output, even through `{:?}`.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub struct IsAdminRequest {
    pub user_id: UserId,
}

#[derive(Debug)]
pub enum ClientMessagePayload {
    Login(LoginRequest),
    Register(RegisterRequest),
    IsAdmin(IsAdminRequest),
}

#[derive(Debug)]
pub struct ClientMessage {
    pub payload: ClientMessagePayload,
}

impl ProtoDeserializable<proto::ClientMessage> for ClientMessage {
    fn from_proto(proto_message: proto::ClientMessage) -> Result<Self, String> {
        if proto_message.request_id.is_none() {
            return Err("Client message must have a request_id".to_string());
        }
        let payload = match proto_message.payload {
            Some(proto::client_message::Payload::Login(request)) => {
                ClientMessagePayload::Login(LoginRequest::from_proto(request)?)
            }
            Some(proto::client_message::Payload::Register(request)) => {
                ClientMessagePayload::Register(RegisterRequest::from_proto(request)?)
            }
            Some(proto::client_message::Payload::IsAdmin(request)) => {
                ClientMessagePayload::IsAdmin(IsAdminRequest::from_proto(request)?)
            }
            None => return Err("Client message must have a payload".to_string()),
        };
        Ok(Self { payload })
    }
}

impl ProtoDeserializable<proto::LoginRequest> for LoginRequest {
    fn from_proto(request: proto::LoginRequest) -> Result<Self, String> {
        require_credentials(&request.email, &request.password)?;
        if request.app_id == 0 {
            return Err("app_id is required".to_string());
        }
        Ok(Self {
            email: request.email,
            password: request.password,
            app_id: AppId(request.app_id),
        })
    }
}

impl ProtoDeserializable<proto::RegisterRequest> for RegisterRequest {
    fn from_proto(request: proto::RegisterRequest) -> Result<Self, String> {
        require_credentials(&request.email, &request.password)?;
        Ok(Self {
            email: request.email,
            password: request.password,
        })
    }
}

impl ProtoDeserializable<proto::IsAdminRequest> for IsAdminRequest {
    fn from_proto(request: proto::IsAdminRequest) -> Result<Self, String> {
        if request.user_id == 0 {
            return Err("user_id is required".to_string());
        }
        Ok(Self {
            user_id: UserId(request.user_id),
        })
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }
    if password.is_empty() {
        return Err("password is required".to_string());
    }
    Ok(())
}
