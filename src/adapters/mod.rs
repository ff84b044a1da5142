//! Terminal and filesystem implementations of the session ports

pub mod clipboard;
pub mod display;
pub mod location;
pub mod notifier;

pub use clipboard::SystemClipboard;
pub use display::{RenderMode, TerminalDisplay};
pub use location::{FileNavigator, LocationRecord};
pub use notifier::TerminalNotifier;
