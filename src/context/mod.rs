pub mod extractor;
pub mod format;
pub mod types;

pub use extractor::{ContextExtractor, extract_context};
pub use types::{
    BodyMode, ContextConfig, ContextMode, ContextRefresh, LinkFilter, NamedSection, PageLink,
    SectionText, SiteContext,
};
