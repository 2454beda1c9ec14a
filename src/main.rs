//! sheet-invoicer main entrypoint.

use sheet_invoicer::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
