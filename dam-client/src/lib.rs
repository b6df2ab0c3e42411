//! Signed-request client for the upstream DAM function API.
//!
//! Layers, leaf first:
//!
//! | Module        | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | [`signature`] | query-string building and `sign` computation            |
//! | [`transport`] | `UpstreamTransport` seam (reqwest + in-memory fake)     |
//! | [`gateway`]   | one signed call per invocation, sentinel handling       |
//! | [`enrich`]    | one batched thumbnail lookup per listing page           |
//! | [`picker`]    | search, featured collections, collection assets, detail |

pub mod credential;
pub mod enrich;
pub mod error;
pub mod gateway;
pub mod mime;
pub mod models;
pub mod picker;
pub mod signature;
pub mod transport;
pub mod upstream;

pub use credential::{Credential, RequestContext};
pub use error::ClientError;
pub use gateway::{Gateway, GatewayOptions};
pub use picker::Picker;
pub use transport::{FakeTransport, ReqwestTransport, UpstreamTransport};
