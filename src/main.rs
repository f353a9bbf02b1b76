fn main() {
    if let Err(err) = fonda::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
