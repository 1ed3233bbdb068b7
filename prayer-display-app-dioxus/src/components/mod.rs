mod error_banner;
mod event_list;
mod header;

pub use error_banner::ErrorBanner;
pub use event_list::EventList;
pub use header::Header;
