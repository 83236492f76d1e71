//! gangway: the HTTP front door of the API bridge. It exposes an OpenAI-style
//! surface plus per-provider routes, translates each request into the target
//! provider's native call through [`irisllm`], and normalizes replies into the
//! common envelopes. One inbound request maps to at most one outbound call, or
//! to a pass-through stream; nothing is stored, retried, or shared between
//! requests beyond the configuration and the HTTP client.

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod fetch;
pub mod handlers;
