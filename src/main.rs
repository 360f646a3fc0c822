fn main() {
    if let Err(err) = git_history_svg::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
