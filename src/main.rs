use clap::Parser;
use igem_up1_toolbox::app::{self, Cli};

/// 프로그램의 엔트리 포인트. 인자를 해석하고 명령 하나를 실행한다.
fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(app::log_level(cli.verbose, cli.quiet))
        .init();

    if let Err(err) = app::run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
