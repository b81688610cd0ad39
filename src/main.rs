fn main() {
    if let Err(e) = triage_hub_lib::run() {
        eprintln!("triage-hub: {e}");
        std::process::exit(1);
    }
}
