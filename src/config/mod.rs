//! Configuration module

mod site;

pub use site::CollectionOverride;
pub use site::CommentsConfig;
pub use site::MarkdownConfig;
pub use site::OutputMode;
pub use site::SiteConfig;
pub use site::ThemesConfig;
