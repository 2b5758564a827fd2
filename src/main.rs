use faker_api::cli::run_cli;
use faker_api::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let _logging = init_logging()?;
    run_cli()
}
