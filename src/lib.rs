pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod gallery;
pub mod i18n;
pub mod instagram;
pub mod loader;
pub mod media;
pub mod modal;
pub mod page;
pub mod scheduler;
pub mod server;
pub mod session;
pub mod toggle;
