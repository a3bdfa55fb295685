//! Client for calling a remote agent's routes (§4.4).
//!
//! - [`A2AClient`] — high-level client: `ask`, `send_message`, `send_task`, `stream`
//! - [`CardResolver`] — discovers agent cards at their well-known paths
//! - [`transport::HttpTransport`] — the underlying HTTP layer
//! - [`SseStream`] / [`Chunk`] / [`ChunkKind`] — parsed SSE event stream
//!
//! # Quick start
//!
//! ```no_run
//! use agentwire::client::A2AClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = A2AClient::connect_url("http://localhost:7420").await?;
//! let reply = client.ask("Hello, agent!").await?;
//! println!("{reply}");
//!
//! let mut stream = client.stream_text("Write a haiku").await?;
//! while let Some(chunk) = stream.next().await {
//!     println!("{:?}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod card_resolver;
mod sse;
pub mod transport;

pub use a2a_client::A2AClient;
pub use card_resolver::CardResolver;
pub use sse::{Chunk, ChunkKind, SseStream};
pub use transport::HttpTransport;
