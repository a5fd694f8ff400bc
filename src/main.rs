use log::LevelFilter;
use marshal::{MarshalError, Value, reader};
use mimalloc::MiMalloc;
use posix::{caps, error_report};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, clap::Parser)]
#[command(about = "Calls POSIX wrappers with host-notation arguments")]
struct Posixglue {
    /// Print every export with its arity and required feature.
    #[arg(long)]
    list: bool,

    /// Print the capability table.
    #[arg(long)]
    features: bool,

    /// Override `POSIXGLUE_LOG`.
    #[arg(long, value_name = "LEVEL")]
    log: Option<LevelFilter>,

    name: Option<String>,

    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cmdline: Posixglue = clap::Parser::parse();

    if let Err(err) = posix::install() {
        eprintln!("posixglue: failed to install logger: {err}");
        error_report::fast_fail();
    }
    if let Some(level) = cmdline.log {
        log::set_max_level(level);
    }

    if cmdline.list {
        print_exports();
    }
    if cmdline.features {
        print_features();
    }
    let Some(name) = &cmdline.name else {
        return;
    };

    let mut args = parse_args(&cmdline.args);
    match marshal::invoke(name, &mut args) {
        Ok(value) => println!("{value}"),
        Err(err) => fail(err),
    }
}

fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter()
        .map(|text| {
            reader::parse(text).unwrap_or_else(|err| {
                eprintln!("posixglue: bad argument `{text}`: {err}");
                std::process::exit(1);
            })
        })
        .collect()
}

fn print_exports() {
    for export in marshal::registered() {
        match export.requires {
            Some(feature) => println!("{} {} {feature}", export.name, export.arity),
            None => println!("{} {}", export.name, export.arity),
        }
    }
}

fn print_features() {
    for (feature, on) in caps::table() {
        println!("{feature} {}", if *on { "yes" } else { "no" });
    }
}

fn fail(err: MarshalError) -> ! {
    eprintln!("posixglue: {err}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn log_level_and_hyphenated_args() {
        let cmdline = Posixglue::try_parse_from(["posixglue", "--log", "debug", "kill", "-1", "9"]).unwrap();
        assert_eq!(cmdline.log, Some(LevelFilter::Debug));
        assert_eq!(cmdline.name.as_deref(), Some("kill"));
        assert_eq!(cmdline.args, ["-1", "9"]);
        assert!(Posixglue::try_parse_from(["posixglue", "--log", "loud"]).is_err());
    }
}
