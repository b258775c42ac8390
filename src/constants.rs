//! Constants for the course marketplace SDK
//!
//! All configuration for the catalog and rate feed is centralized here.
//! No runtime configuration (config.yml) is used - the system operates
//! transparently with these compile-time constants.

/// Decimal places of the native payment asset (wei per ETH = 10^18)
pub const NATIVE_DECIMALS: u32 = 18;

/// Smallest-unit amount equal to one whole native asset unit
pub const WEI_PER_NATIVE: u128 = 1_000_000_000_000_000_000;

/// Fixed fallback text when no fiat rate is available
pub const FIAT_FALLBACK_DISPLAY: &str = "0.00";

/// How often to fetch the fiat rate from the feed (in seconds)
pub const RATE_REFRESH_INTERVAL_SECS: u64 = 60;

/// How long before a rate snapshot is considered stale (in seconds)
pub const RATE_STALE_THRESHOLD_SECS: u64 = 300;

/// HTTP request timeout when fetching rates (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum number of retry attempts when the rate feed fails
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay for retries (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff delay for retries (in milliseconds)
pub const MAX_BACKOFF_MS: u64 = 30000;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// CoinGecko asset id of the native payment asset
pub const COINGECKO_NATIVE_ASSET_ID: &str = "ethereum";

/// Coinbase spot price endpoint for the native asset
pub const COINBASE_SPOT_URL: &str = "https://api.coinbase.com/v2/prices/ETH-USD/spot";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "course-market-sdk/0.1.0";
