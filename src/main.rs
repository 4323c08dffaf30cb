use jita::cli::run;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);

        let mut causes = e.chain().skip(1).peekable();
        if causes.peek().is_some() {
            eprintln!("\nCaused by:");
            for cause in causes {
                eprintln!("    {}", cause);
            }
        }

        std::process::exit(1);
    }
}
