fn main() {
    if let Err(error) = stratus::cli::run() {
        eprintln!("error: {:#}", error);
        std::process::exit(1);
    }
}
