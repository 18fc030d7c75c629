mod ip_geolocation_client;
mod nominatim_client;

pub use ip_geolocation_client::IpGeolocationClient;
pub use nominatim_client::NominatimClient;
