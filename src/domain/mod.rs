mod access_point;
mod availability;
mod location;

pub use access_point::AccessPoint;
pub use availability::ProviderAvailability;
pub use location::{Fix, LocationCandidate, LocationMethod, UnknownMethod};
