pub mod client_message;
pub mod ids;

pub use ids::{AppId, UserId};

pub trait ProtoDeserializable<T> {
    fn from_proto(proto_obj: T) -> Result<Self, String>
    where
        Self: Sized;
}

pub trait ProtoSerializable<T> {
    fn to_proto(self) -> T;
}
