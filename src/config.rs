use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Foursquare Places API key; the adapter is disabled when absent
    #[serde(default)]
    pub foursquare_api_key: Option<String>,

    /// Foursquare Places API base URL
    #[serde(default = "default_foursquare_api_url")]
    pub foursquare_api_url: String,

    /// OpenTripMap API key; the adapter is disabled when absent
    #[serde(default)]
    pub opentripmap_api_key: Option<String>,

    /// OpenTripMap API base URL
    #[serde(default = "default_opentripmap_api_url")]
    pub opentripmap_api_url: String,

    /// Redis connection URL for caching remote place searches
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Optional JSON restaurant dataset merged into the local catalog
    #[serde(default)]
    pub catalog_dataset_path: Option<String>,

    /// Per-request timeout applied by the remote adapters
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    /// Search radius sent to the remote place APIs
    #[serde(default = "default_search_radius_meters")]
    pub search_radius_meters: u32,

    /// Backfill threshold for recommendation lists
    #[serde(default = "default_min_results")]
    pub min_results: usize,

    /// Maximum number of remote-only restaurants appended to a list
    #[serde(default = "default_remote_enrichment_cap")]
    pub remote_enrichment_cap: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_foursquare_api_url() -> String {
    "https://api.foursquare.com".to_string()
}

fn default_opentripmap_api_url() -> String {
    "https://api.opentripmap.com".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    5
}

fn default_search_radius_meters() -> u32 {
    5000
}

fn default_min_results() -> usize {
    8
}

fn default_remote_enrichment_cap() -> usize {
    3
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
