mod background;
mod managed;
mod wireless;

pub use background::BackgroundLocator;
pub use managed::{InitTask, ManagedLocator};
pub use wireless::{WirelessError, WirelessLocator};
