fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    if let Err(err) = snowglobe::run() {
        eprintln!("snowglobe: {err}");
        std::process::exit(1);
    }
}
