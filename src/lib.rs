#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod context;
pub mod conversation;
pub mod error;
pub mod page;
pub mod panel;
pub mod render;
pub mod transport;
pub mod widget;

pub use config::Config;
pub use context::ContextExtractor;
pub use conversation::{ConversationLog, Message, Role};
pub use error::{HannahError, HannahResult, TransportError};
pub use panel::{ChatPanel, PanelView};
pub use render::Renderer;
pub use transport::{ChatRequest, ChatTransport, HttpTransport};
pub use widget::{SubmitOutcome, Widget};
