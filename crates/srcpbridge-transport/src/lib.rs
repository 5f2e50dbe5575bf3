//! srcpbridge-transport: The two transport adapters the bridge runs on.
//!
//! - [`SrcpEndpoint`] -- the connectionless UDP endpoint serving legacy
//!   SRCP control clients
//! - [`FeedClient`] -- the WebSocket connection to the FM-DX webserver's
//!   `/text` feed
//!
//! Both adapters carry bytes only; all translation state lives in
//! `srcpbridge-core`. Connection lifecycle is deliberately simple: the
//! binary establishes both at startup and exits when the feed closes.
//! There is no reconnect or backoff layer.

pub mod feed;
pub mod udp;

pub use feed::FeedClient;
pub use udp::SrcpEndpoint;
