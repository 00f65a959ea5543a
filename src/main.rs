use avt_tools::WorldFile;
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <world-file>...", args[0]);
        std::process::exit(1);
    }

    let mut failed = false;

    // Each file is processed on its own; a decode failure in one never
    // stops the others.
    for path in &args[1..] {
        println!("Reading world file: {}", path);
        println!("{}", "=".repeat(60));

        match WorldFile::load(path) {
            Ok(world) => print_report(&world),
            Err(e) => {
                eprintln!("ERROR: Failed to decode {}", path);
                eprintln!("  {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn print_report(world: &WorldFile) {
    print_section("Rooms", &world.rooms);
    print_section("Directions", &world.directions);
    print_section("Items", &world.items);
    print_section("Synonyms", &world.synonyms);
    print_section("Monsters", &world.monsters);
    print_section("Phenomena", &world.phenomena);

    println!("\nVerbs ({}):", world.verbs.len());
    for (i, verb) in world.verbs.iter().enumerate() {
        println!("{:3} {}", i + 1, verb);
    }

    println!("\nStrings ({}):", world.strings.len());
    for (i, string) in world.strings.iter().enumerate() {
        println!("{:3} {}", i + 1, string);
    }
}

fn print_section(title: &str, records: &[avt_tools::Record]) {
    println!("\n{} ({}):", title, records.len());
    for (i, record) in records.iter().enumerate() {
        println!("{:3}: {}", i + 1, record);
    }
}
