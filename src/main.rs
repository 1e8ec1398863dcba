use clap::Parser;
use sheetcols::{Cli, Sheetcols};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

/// Export failures are reported on the console; the exit status stays 0.
fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging();

    let app = Sheetcols::from_cli(&cli);

    let mut form = app.load_form();
    form.apply_overrides(&cli.form_overrides());

    if cli.interactive {
        let stdin = io::stdin();
        if let Err(e) = form.prompt(&mut stdin.lock(), &mut io::stderr()) {
            app.handle_error(&e);
            return 0;
        }
    }

    if cli.dry_run {
        let request = form.to_request(cli.header_row);
        app.output_formatter().print_request(&request, app.settings_path());
        return 0;
    }

    app.run_export(&form, cli.header_row, !cli.no_save);
    0
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetcols=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
