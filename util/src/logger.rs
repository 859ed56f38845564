use std::io::Write;

/// Installs the global logger. Verbosity comes from `RUST_LOG`, e.g.
/// `RUST_LOG=ski=trace` prints every rewrite step.
pub fn init() {
    env_logger::builder()
        .format(|buf, record| {
            let ts = buf.timestamp();
            writeln!(
                buf,
                "{} {}:{} [{}] - {}",
                ts,
                record.file().unwrap_or("unknown"),
                record
                    .line()
                    .map(|num| num.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.level(),
                record.args()
            )
        })
        .init();
}
