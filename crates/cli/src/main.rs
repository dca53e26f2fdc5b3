use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{command, Arg, ArgAction};
use rof::{Reader, RofFile};

mod pretty;

fn main() -> Result<()> {
    let matches = command!()
        .max_term_width(100)
        .args(&[
            Arg::new("file")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf))
                .help("ROF file(s) to disassemble"),
            Arg::new("individual")
                .short('i')
                .action(ArgAction::SetTrue)
                .help("Write each module's listing to <modulename>.asm instead of stdout"),
            Arg::new("rof-info")
                .short('r')
                .action(ArgAction::SetTrue)
                .help("Prepend header and relocation table information"),
            Arg::new("global")
                .short('g')
                .action(ArgAction::SetTrue)
                .help("Reserved; accepted for compatibility"),
            Arg::new("offsets")
                .short('o')
                .action(ArgAction::SetTrue)
                .help("Reserved; accepted for compatibility"),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging"),
        ])
        .get_matches();

    if matches.get_flag("verbose") {
        env_logger::builder()
            .format_level(false)
            .format_target(false)
            .filter_module("rof", log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::builder()
            .filter_level(log::LevelFilter::Warn)
            .init();
    }

    let individual = matches.get_flag("individual");
    let rof_info = matches.get_flag("rof-info");

    for path in matches.get_many::<PathBuf>("file").unwrap_or_default() {
        disassemble_file(path, individual, rof_info)?;
    }

    Ok(())
}

fn disassemble_file(path: &PathBuf, individual: bool, rof_info: bool) -> Result<()> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;
    let data = unsafe { memmap2::Mmap::map(&file) }
        .with_context(|| format!("failed to map '{}'", path.display()))?;
    let data = &*data;

    let filename = path.display().to_string();
    let mut reader = Reader::new(data);
    let mut unit_count = 0usize;

    loop {
        let unit = match RofFile::load(&mut reader, &filename) {
            Ok(unit) => unit,
            Err(rof::LoadError::NoMore) => {
                if unit_count == 0 {
                    anyhow::bail!("'{}' does not contain any relocatable object files", filename);
                }
                break;
            }
            Err(rof::LoadError::Failed(e)) => {
                return Err(e).with_context(|| format!("failed to parse '{}'", filename));
            }
        };

        eprintln!("Disassembling {}", unit.name);

        let mut listing = String::new();
        if rof_info {
            listing.push_str(&pretty::dump_rof_info(&unit));
        }
        listing.push_str(&rof::disassemble(&unit));

        if individual {
            let out_name = format!("{}.asm", unit.name);
            fs::File::create(&out_name)
                .and_then(|mut f| f.write_all(listing.as_bytes()))
                .with_context(|| format!("failed to write '{}'", out_name))?;
        } else {
            print!("{}", listing);
        }

        unit_count += 1;
    }

    Ok(())
}
