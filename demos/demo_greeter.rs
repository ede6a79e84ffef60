use flagset::{Binding, ErrorHandling, FlagSet, Opt, ParseError};

#[derive(Debug)]
pub struct Params {
    name: Binding<String>,
    shout: Binding<bool>,
    times: Binding<u8>,
    verbosity: Binding<isize>,
}

fn main() {
    let arguments: Vec<String> = std::env::args().skip(1).collect();
    let tokens: Vec<&str> = arguments.iter().map(String::as_str).collect();
    let (params, names) = parse_tokens(&tokens, ErrorHandling::ExitOnError)
        .expect("flag errors exit the process");

    let target = names.first().cloned().unwrap_or_else(|| params.name.get());
    let mut greeting = format!("Hello, {target}!");

    if params.shout.get() {
        greeting = greeting.to_uppercase();
    }

    for _ in 0..params.times.get() {
        println!("{greeting}");
    }

    if params.verbosity.get() > 0 {
        eprintln!("greeted {target} {} time(s)", params.times.get());
    }
}

// Unit-testable function to configure the flags and parse the specified tokens.
fn parse_tokens(
    tokens: &[&str],
    error_handling: ErrorHandling,
) -> Result<(Params, Vec<String>), ParseError> {
    let mut flags = FlagSet::new("greeter", error_handling);
    let params = Params {
        name: flags.string("name", "world", "who to `greet`", &[Opt::Shorthand('n')]),
        shout: flags.bool(
            "shout",
            false,
            "greet loudly",
            &[Opt::Shorthand('s'), Opt::AddNegative],
        ),
        times: flags.uint8("times", 1, "how many times to greet", &[Opt::Shorthand('t')]),
        verbosity: flags.count(
            "verbose",
            "report what was done",
            &[Opt::Shorthand('v'), Opt::Group("diagnostics".to_string())],
        ),
    };

    flags.parse(tokens)?;
    Ok((params, flags.args().to_vec()))
}
