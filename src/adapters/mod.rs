// Adapters layer: concrete implementations for external systems (http, url files).

pub mod http;
pub mod url_file;

pub use http::{HttpCampaignClient, HttpSitemapFetcher};
pub use url_file::read_url_list;
