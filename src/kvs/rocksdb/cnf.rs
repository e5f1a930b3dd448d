use once_cell::sync::Lazy;

pub static ROCKSDB_THREAD_COUNT: Lazy<i32> =
	lazy_env_parse_or_else!("TRIPLEDB_ROCKSDB_THREAD_COUNT", i32, |_| num_cpus::get() as i32);

pub static ROCKSDB_WRITE_BUFFER_SIZE: Lazy<usize> =
	lazy_env_parse!("TRIPLEDB_ROCKSDB_WRITE_BUFFER_SIZE", usize, 32 * 1024 * 1024);

pub static ROCKSDB_TARGET_FILE_SIZE_BASE: Lazy<u64> =
	lazy_env_parse!("TRIPLEDB_ROCKSDB_TARGET_FILE_SIZE_BASE", u64, 64 * 1024 * 1024);

pub static ROCKSDB_MAX_WRITE_BUFFER_NUMBER: Lazy<i32> =
	lazy_env_parse!("TRIPLEDB_ROCKSDB_MAX_WRITE_BUFFER_NUMBER", i32, 4);

pub static ROCKSDB_MIN_WRITE_BUFFER_NUMBER_TO_MERGE: Lazy<i32> =
	lazy_env_parse!("TRIPLEDB_ROCKSDB_MIN_WRITE_BUFFER_NUMBER_TO_MERGE", i32, 2);

pub static ROCKSDB_KEEP_LOG_FILE_NUM: Lazy<usize> =
	lazy_env_parse!("TRIPLEDB_ROCKSDB_KEEP_LOG_FILE_NUM", usize, 10);
