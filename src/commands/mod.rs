//! Command implementations
//!
//! Each workflow of the forwarder lives in its own module and maps to one
//! CLI subcommand (or one interactive menu entry).

pub mod copy;
pub mod forward;
pub mod list_chats;
pub mod menu;

// Re-export commonly used types
pub use copy::run as copy_run;
pub use forward::{run as forward_run, Cursor, KeywordFilter};
pub use list_chats::run as list_chats_run;
pub use menu::{run as menu_run, MenuChoice};
