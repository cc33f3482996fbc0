mod app;
mod cli;
mod input;
mod logging;

use clap::Parser;

use app::App;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::init_logging(args.verbose);

    let app = App::new(args)?;
    app.run()?;

    Ok(())
}
