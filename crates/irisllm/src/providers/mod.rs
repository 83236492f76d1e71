pub mod id;

pub use id::ProviderId;
