use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = eventboard::app::run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e.red());
        exit(1);
    }
}
