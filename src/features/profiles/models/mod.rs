mod profile;

pub use profile::{CreateProfile, Profile, ProfileRole, ProfileSource, Resolved, UpdateProfile};

#[cfg(test)]
pub(crate) use profile::fixtures;
