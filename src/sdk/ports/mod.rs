//! Port contracts for the coding-agent backend.

mod transport;

pub use transport::{
    SdkEventStream, SdkTransport, SessionConnection, TransportError, TransportErrorKind,
};
