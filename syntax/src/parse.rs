use combine::easy;
use combine::parser::char::{alpha_num, char, digit, string};
use combine::parser::range::recognize;
use combine::{attempt, optional, skip_many, skip_many1, EasyParser, Parser};

type Input<'a> = easy::Stream<&'a str>;

/// Parse the elapsed time declared on a solver log line,
/// e.g. `ExecutionTime = 12.5 s  ClockTime = 13 s`.
///
/// Only a declaration at the very start of the line counts;
/// anything after the number is ignored.
pub fn execution_time(line: &str) -> Option<f64> {
    string("ExecutionTime = ")
        .with(decimal())
        .easy_parse(line)
        .ok()
        .map(|(secs, _rest)| secs)
}

/// Parse a mesh size declaration, in either of the forms
/// `Mesh region0 size: 8000000` or `Mesh size: 8000000`.
pub fn mesh_size(line: &str) -> Option<u64> {
    string("Mesh ")
        .with(mesh_size_label())
        .with(unsigned())
        .easy_parse(line)
        .ok()
        .map(|(cells, _rest)| cells)
}

fn mesh_size_label<'a>() -> impl Parser<Input<'a>, Output = ()> {
    attempt(string("size: "))
        .map(|_| ())
        .or(attempt((word(), string(" size: "))).map(|_| ()))
}

fn word<'a>() -> impl Parser<Input<'a>, Output = &'a str> {
    recognize(skip_many1(alpha_num().or(char('_'))))
}

pub(crate) fn unsigned<'a>() -> impl Parser<Input<'a>, Output = u64> {
    recognize(skip_many1(digit())).and_then(|digits: &str| digits.parse::<u64>())
}

// digits, optionally followed by a '.' and more (possibly zero) digits.
fn decimal<'a>() -> impl Parser<Input<'a>, Output = f64> {
    recognize((
        skip_many1(digit()),
        optional((char('.'), skip_many(digit()))),
    ))
    .and_then(|num: &str| num.parse::<f64>())
}
