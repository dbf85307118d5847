mod get_profile_page_data;
mod get_watch_history;
mod update_profile;

pub use get_profile_page_data::*;
pub use get_watch_history::*;
pub use update_profile::*;
