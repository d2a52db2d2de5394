use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    let cmd = siteaudit::cli::Cli::command();
    let man_dir = Path::new("man");
    fs::create_dir_all(man_dir)?;

    // One page for siteaudit plus one per subcommand
    clap_mangen::generate_to(cmd, man_dir)?;

    let mut generated: Vec<_> = fs::read_dir(man_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    generated.sort();
    for path in generated {
        println!("Generated {}", path.display());
    }

    Ok(())
}
