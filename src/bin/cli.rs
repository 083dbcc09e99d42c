use clap::{App, Arg, SubCommand};
use seurat::{
    codegen::{write_header, CppHeaderGenerator},
    layout::LayoutSpec,
    segment::{self, Segment},
    Result,
};

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("seurat-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Schema-driven shared memory layout tool")
        .subcommand(
            SubCommand::with_name("compile")
                .about("Compile a schema and print the computed layout")
                .arg(
                    Arg::with_name("schema")
                        .short("s")
                        .long("schema")
                        .value_name("FILE")
                        .help("Path to the JSON schema")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("codegen")
                .about("Generate the C++ layout header for a schema")
                .arg(
                    Arg::with_name("schema")
                        .short("s")
                        .long("schema")
                        .value_name("FILE")
                        .help("Path to the JSON schema")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("out")
                        .short("o")
                        .long("out")
                        .value_name("FILE")
                        .help("Output header path (stdout if omitted)")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create (or replace) the segment described by a schema")
                .arg(
                    Arg::with_name("schema")
                        .short("s")
                        .long("schema")
                        .value_name("FILE")
                        .help("Path to the JSON schema")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("destroy")
                .about("Unlink a named segment")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .value_name("NAME")
                        .help("Segment name")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Attach to a named segment and report its size")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .value_name("NAME")
                        .help("Segment name")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("compile", Some(sub)) => {
            let layout = LayoutSpec::from_file(sub.value_of("schema").unwrap())?;
            print_layout(&layout);
        }
        ("codegen", Some(sub)) => {
            let layout = LayoutSpec::from_file(sub.value_of("schema").unwrap())?;
            match sub.value_of("out") {
                Some(path) => {
                    write_header(&layout, path)?;
                    println!("Wrote {}", path);
                }
                None => {
                    print!("{}", CppHeaderGenerator::new().generate(&layout)?);
                }
            }
        }
        ("create", Some(sub)) => {
            let layout = LayoutSpec::from_file(sub.value_of("schema").unwrap())?;
            let mut seg = Segment::create_or_replace(&layout.posix_name(), layout.total_size)?;
            println!(
                "Created segment '{}' ({} bytes, {} fields)",
                seg.name(),
                seg.size(),
                layout.field_count()
            );
            // Leave the OS object in place for collaborating processes.
            seg.close(false)?;
        }
        ("destroy", Some(sub)) => {
            let name = sub.value_of("name").unwrap();
            segment::unlink(name)?;
            println!("Destroyed segment '{}'", name);
        }
        ("info", Some(sub)) => {
            let mut seg = Segment::attach(sub.value_of("name").unwrap())?;
            println!("Segment '{}': {} bytes", seg.name(), seg.size());
            seg.close(false)?;
        }
        _ => {
            eprintln!("No subcommand given; try --help");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_layout(layout: &LayoutSpec) {
    println!(
        "Segment '{}' ({} bytes, {} fields)",
        layout.segment_name,
        layout.total_size,
        layout.field_count()
    );
    println!("{:<20} {:>8} {:>12} {:>10}  shape", "name", "type", "offset", "bytes");
    for field in &layout.fields {
        let shape = if field.is_scalar() {
            "scalar".to_string()
        } else {
            format!("{:?}", field.shape)
        };
        println!(
            "{:<20} {:>8} {:>12} {:>10}  {}",
            field.name,
            field.element_type.type_name(),
            field.offset,
            field.byte_size,
            shape
        );
    }
}
