//! Console output for the walker CLI
//!
//! Per-item lines go to stdout so listings can be piped or redirected; the
//! header and summary describe the run itself.

use console::style;
use std::time::Duration;

/// Print the run header before the walk starts.
pub fn print_header(host: &str, username: &str, start_path: &str) {
    println!("{}", style("=== FTP directory walker ===").bold());
    println!("Host:      {host}");
    println!("User:      {username}");
    println!("Directory: {start_path}");
    println!();
}

/// Print one discovered path, tagged by kind.
pub fn print_item(path: &str) {
    if path.ends_with('/') {
        println!("{} {}", style("[dir] ").cyan(), path);
    } else {
        println!("{} {}", style("[file]").green(), path);
    }
}

/// Print the final walk report.
pub fn print_summary(files: u64, directories: u64, duration: Duration, interrupted: bool) {
    let total = files + directories;
    let secs = duration.as_secs_f64();

    println!();
    if interrupted {
        println!("{}", style("Walk interrupted").yellow().bold());
    }
    println!("Files:       {}", format_number(files));
    println!("Directories: {}", format_number(directories));
    println!("Total:       {}", format_number(total));
    println!("Elapsed:     {secs:.2}s");
    if secs > 0.0 {
        println!("Rate:        {:.2} items/s", total as f64 / secs);
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}
