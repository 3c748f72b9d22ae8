// gen-string CLI: preview marker expansion and run the bundled example suite.
// Usage: cargo run --bin gen-string -- preview -n 4 --kind alpha --length 12

fn main() {
    match gen_string::cli::run() {
        Ok(code) => std::process::exit(code),
        Err(report) => {
            eprintln!("{:?}", report);
            std::process::exit(2);
        }
    }
}
