use log::LevelFilter;

pub fn init() {
    // Info by default; RUST_LOG directives are applied on top.
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_env(env_logger::Env::default())
        .target(env_logger::Target::Stderr)
        .init();
}
