//! Client-side page cache and soft navigation.
//!
//! This crate provides the moving parts that sit on top of the core store:
//! the HTTP page fetcher, the delayed background preloader, the navigation
//! interceptor, and the session wiring that starts them in the right order.

pub mod fetch;
pub mod nav;
pub mod preload;
pub mod session;

#[cfg(test)]
mod testing;

pub use fetch::{FetchConfig, HttpFetcher, PageFetcher, warm_page};
pub use nav::{ClickOutcome, HistoryState, HostPage, NavInterceptor, SCROLL_RESTORE_DELAY};
pub use preload::{PRELOAD_DELAY, Preloader};
pub use session::Session;
