//! banzai_sunrise — interactive entry point.

use banzai_sunrise::app::{run, AppConfig, USAGE};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Banzai Sunrise — raise your hands, raise the sun    ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let result = AppConfig::from_args(args).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
