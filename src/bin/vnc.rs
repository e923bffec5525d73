use anyhow::Result;
use vn_script_compiler::config::Config;
use vn_script_compiler::driver;

fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    driver::run(&config)
}
