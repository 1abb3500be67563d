//! Request gateway between the wire protocol and the auth service.
//!
//! Validates each `ClientMessage`, runs the matching service call under the
//! configured deadline and maps the outcome onto a `google.rpc.Status`.
//! Internal failures surface as a fixed message; collaborator detail never
//! reaches the client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    auth::{AuthError, AuthService},
    proto,
    types::{
        ProtoDeserializable, ProtoSerializable,
        client_message::{
            ClientMessage, ClientMessagePayload, IsAdminRequest, LoginRequest, RegisterRequest,
        },
    },
};

impl ProtoSerializable<proto::google::rpc::Status> for AuthError {
    fn to_proto(self) -> proto::google::rpc::Status {
        use proto::google::rpc::Code;

        let (code, message) = match self {
            Self::InvalidCredentials => (Code::Unauthenticated, "invalid email or password"),
            Self::UserExists => (Code::AlreadyExists, "user already exists"),
            Self::UserNotFound => (Code::NotFound, "user not found"),
            Self::AppNotFound => (Code::NotFound, "app not found"),
            Self::Internal => (Code::Internal, "internal error"),
        };
        proto::google::rpc::Status {
            code: code.into(),
            message: message.to_string(),
            ..Default::default()
        }
    }
}

fn status(code: proto::google::rpc::Code, message: &str) -> proto::google::rpc::Status {
    proto::google::rpc::Status {
        code: code.into(),
        message: message.to_string(),
        ..Default::default()
    }
}

fn error_response(status: proto::google::rpc::Status) -> proto::ServerResponse {
    proto::ServerResponse {
        status: Some(status),
        ..Default::default()
    }
}

fn ok_response(payload: proto::server_response::Payload) -> proto::ServerResponse {
    proto::ServerResponse {
        status: Some(status(proto::google::rpc::Code::Ok, "")),
        payload: Some(payload),
        ..Default::default()
    }
}

/// Per-connection request handler.
///
/// Cheap to construct; all connections share one `AuthService`.
pub struct ClientConnection {
    service: Arc<AuthService>,
    request_timeout: Duration,
}

impl ClientConnection {
    #[must_use]
    pub const fn new(service: Arc<AuthService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Handle one client message and produce the reply.
    ///
    /// The reply echoes the message's `request_id`. Dropping the returned
    /// future cancels any store call in flight.
    pub async fn handle_message(
        &self,
        proto_message: proto::ClientMessage,
    ) -> proto::ServerMessage {
        let request_id = proto_message.request_id;
        let message = match ClientMessage::from_proto(proto_message) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!("rejected client message: {err}");
                return proto::ServerMessage {
                    response: Some(proto::ServerResponse {
                        request_id,
                        status: Some(status(proto::google::rpc::Code::InvalidArgument, &err)),
                        ..Default::default()
                    }),
                };
            }
        };
        let mut response = match message.payload {
            ClientMessagePayload::Login(request) => self.login(request).await,
            ClientMessagePayload::Register(request) => self.register(request).await,
            ClientMessagePayload::IsAdmin(request) => self.is_admin(request).await,
        };
        response.request_id = request_id;
        proto::ServerMessage {
            response: Some(response),
        }
    }

    async fn login(&self, request: LoginRequest) -> proto::ServerResponse {
        let result = self
            .with_deadline(
                self.service
                    .login(&request.email, &request.password, request.app_id),
            )
            .await;
        match result {
            Ok(token) => ok_response(proto::server_response::Payload::Login(
                proto::LoginResponse { token },
            )),
            Err(status) => error_response(status),
        }
    }

    async fn register(&self, request: RegisterRequest) -> proto::ServerResponse {
        let result = self
            .with_deadline(
                self.service
                    .register_new_user(&request.email, &request.password),
            )
            .await;
        match result {
            Ok(user_id) => ok_response(proto::server_response::Payload::Register(
                proto::RegisterResponse {
                    user_id: user_id.get(),
                },
            )),
            Err(status) => error_response(status),
        }
    }

    async fn is_admin(&self, request: IsAdminRequest) -> proto::ServerResponse {
        let result = self
            .with_deadline(self.service.is_admin(request.user_id))
            .await;
        match result {
            Ok(is_admin) => ok_response(proto::server_response::Payload::IsAdmin(
                proto::IsAdminResponse { is_admin },
            )),
            Err(status) => error_response(status),
        }
    }

    /// Run a service call, giving up once the request timeout elapses.
    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, proto::google::rpc::Status> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(err.to_proto()),
            Err(_) => {
                tracing::warn!(timeout = ?self.request_timeout, "request deadline exceeded");
                Err(status(
                    proto::google::rpc::Code::DeadlineExceeded,
                    "request deadline exceeded",
                ))
            }
        }
    }
}
