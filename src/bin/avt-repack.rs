use avt_tools::repack_file;
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <world-file>...", args[0]);
        std::process::exit(1);
    }

    let mut failed = false;

    // Each file is rewritten independently; a failure discards that
    // file's temp output and moves on to the next argument.
    for path in &args[1..] {
        match repack_file(path) {
            Ok(()) => println!("Repacked {}", path),
            Err(e) => {
                eprintln!("ERROR: Failed to repack {}", path);
                eprintln!("  {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
