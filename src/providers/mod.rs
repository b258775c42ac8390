//! Fiat rate provider implementations

pub mod coinbase;
pub mod coingecko;
pub mod failover;

pub use coinbase::CoinbaseProvider;
pub use coingecko::CoinGeckoProvider;
pub use failover::FailoverProvider;
