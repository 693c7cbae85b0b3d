/// Logger setup: env_logger with `info` as the default filter, overridable
/// through RUST_LOG.
use std::io::Write;

pub fn init() {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if let Err(e) = result {
        eprintln!("failed to initialize backend logger: {}", e);
    }
}
