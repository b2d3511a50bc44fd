use famtree::cli;
use famtree::config::Config;
use famtree::logging;

fn main() {
    let mut config = Config::from_env();
    let raw: Vec<String> = std::env::args().skip(1).collect();

    if raw.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", cli::USAGE);
        return;
    }

    let args = match config.apply_args(raw) {
        Ok(rest) => rest,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = cli::run(&config, &args) {
        log::error!("event=command_failed module=cli error={}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
