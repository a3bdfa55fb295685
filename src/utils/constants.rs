//! Well-known paths for agent card discovery and the default RPC mount.

/// Primary agent card path.
pub const AGENT_CARD_PATH: &str = "/agent.json";

/// Every route is also mirrored under this prefix (e.g. `/a2a/agent.json`,
/// `/a2a/tasks/send`), matching the dual-mount pattern used across the
/// reference corpus's example servers.
pub const A2A_PREFIX: &str = "/a2a";

/// The `/a2a`-mirrored agent card path.
pub const A2A_AGENT_CARD_PATH: &str = "/a2a/agent.json";

/// The content-sniffed root dispatch route.
pub const DISPATCH_PATH: &str = "/";

/// Task submission route.
pub const TASKS_SEND_PATH: &str = "/tasks/send";

/// Task streaming route (also mounted at `/stream`).
pub const TASKS_STREAM_PATH: &str = "/tasks/stream";

/// Short alias for the streaming route.
pub const STREAM_PATH: &str = "/stream";

/// Default keep-alive comment interval for SSE streams, in seconds.
pub const DEFAULT_KEEPALIVE_SECS: u64 = 15;

/// Default hard timeout for an SSE stream with no progress, in seconds.
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 60;

/// Default budget for delivering the first snapshot of a stream, in seconds.
pub const DEFAULT_FIRST_SNAPSHOT_BUDGET_SECS: u64 = 1;

/// Default budget for probing an agent's card endpoint, in seconds.
pub const DEFAULT_CARD_PROBE_BUDGET_SECS: u64 = 5;

/// Default unary request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
