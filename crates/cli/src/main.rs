fn main() {
    if let Err(e) = cxkit_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
