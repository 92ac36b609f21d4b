use cratehold::config::{LogConfig, StorageConfig};
use cratehold::http::HttpService;
use cratehold::logging::{BufferConfig, BufferPolicy, FlushMode, LoggerBuilder, Manager, RollingFileSink};
use cratehold::storage::{GzipCompressor, MetadataStore};
use cratehold::task_pool::TaskPool;
use cratehold::{log_error, log_info};
use std::sync::Arc;
use tiny_http::Server;

fn main() {
    let mut args = std::env::args().skip(1);
    let storage_conf_path = args.next().unwrap_or_else(|| "./Storage.conf".to_string());
    let log_conf_path = args.next().unwrap_or_else(|| "./log_config.conf".to_string());

    let storage_config = StorageConfig::load(&storage_conf_path).unwrap_or_else(|err| {
        eprintln!("failed to load {storage_conf_path}: {err}");
        std::process::exit(1);
    });
    let log_config = LogConfig::load(&log_conf_path).unwrap_or_else(|err| {
        eprintln!("failed to load {log_conf_path}: {err}");
        std::process::exit(1);
    });

    let backup_pool = Arc::new(TaskPool::new(log_config.thread_count as usize, 1024));
    let buffer_config = BufferConfig {
        initial_size: log_config.buffer_size as usize,
        threshold: log_config.threshold as usize,
        linear_step: log_config.linear_growth as usize,
    };
    let flush_mode = FlushMode::from_u8(log_config.flush_log);
    let sink = RollingFileSink::new("./logs", 64 * 1024 * 1024, flush_mode);

    let logger = LoggerBuilder::new("cratehold")
        .with_sink(Box::new(sink))
        .with_buffer_config(buffer_config)
        .with_buffer_policy(BufferPolicy::Unlimited)
        .with_backup(Arc::clone(&backup_pool), log_config.backup_address())
        .build();
    let _ = Manager::global().set_default(logger);
    let logger = Manager::global().default_logger();

    let metadata = match MetadataStore::open(&storage_config.storage_info) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!("failed to open metadata store: {err}");
            std::process::exit(1);
        }
    };

    let addr = format!("{}:{}", storage_config.server_ip, storage_config.server_port);
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(err) => {
            eprintln!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    log_info!(logger, "listening on {addr}");

    let service = HttpService::new(storage_config, metadata, Arc::new(GzipCompressor), Arc::clone(&logger));
    service.run(&server);
    log_error!(logger, "server loop exited unexpectedly");
}
