pub mod schema;

pub use schema::{Config, ContextConfig, LinkifyConfig, PersonaConfig, TransportConfig};
