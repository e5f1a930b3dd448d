use once_cell::sync::Lazy;

/// Specifies the number of entries fetched per request when scanning a key
/// range in batches.
pub static NORMAL_FETCH_SIZE: Lazy<u32> = lazy_env_parse!("TRIPLEDB_NORMAL_FETCH_SIZE", u32, 500);
