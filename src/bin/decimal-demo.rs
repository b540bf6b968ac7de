//! Small command-line calculator over `Decimal64`: `decimal-demo <A> <op> <B>`.

use std::env;
use std::process;

use dec64::Decimal64;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 3 {
        eprintln!("Usage: <A> <op> <B>");
        process::exit(1);
    }
    let a = parse_operand(&args[0]);
    let b = parse_operand(&args[2]);
    let result = match args[1].as_str() {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => a / b,
        op => {
            eprintln!("Unsupported operation '{}'.", op);
            process::exit(1);
        }
    };
    println!(
        "{}(={}) {} {}(={}) = {}(={})",
        a,
        a.to_bits() as i64,
        args[1],
        b,
        b.to_bits() as i64,
        result,
        result.to_bits() as i64
    );
}

fn parse_operand(s: &str) -> Decimal64 {
    match s.parse() {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Invalid number '{}': {}", s, err);
            process::exit(1);
        }
    }
}
