//! Bridge walkthrough: nest, recover and sneaky on one fallible operation.
//!
//! Run with: `RUST_LOG=fallible_core=debug cargo run --example bridge_walkthrough`

use fallible_core::operation::constant;
use fallible_core::prelude::*;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ArithmeticFailure {
    #[error("cannot divide {0} by zero")]
    DivideByZero(i64),
}

impl Classify for ArithmeticFailure {}

fn divide(a: i64, b: i64) -> Result<i64, ArithmeticFailure> {
    if b == 0 {
        return Err(ArithmeticFailure::DivideByZero(a));
    }
    Ok(a / b)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Nest ===\n");
    let nested = nest(divide);
    println!("10 / 2  -> {:?}", nested.apply((10, 2)));
    match nested.apply((10, 0)) {
        Ok(value) => println!("10 / 0  -> {}", value),
        Err(err) => {
            println!("10 / 0  -> error: {}", err);
            println!("          is BridgeError: {}", err.is::<BridgeError>());
        }
    }

    println!("\n=== Recover ===\n");
    let fallback = recover(divide, |_: &ArithmeticFailure| Some(constant(-1)));
    println!("10 / 0  -> {:?}", fallback.apply((10, 0)));

    let echo = recover(divide, |_: &ArithmeticFailure| Some(|a: i64, _b: i64| a));
    println!("7 / 0   -> {:?} (fallback sees the original arguments)", echo.apply((7, 0)));

    println!("\n=== Sneaky ===\n");
    let erased = sneaky(divide);
    if let Err(err) = erased.apply((3, 0)) {
        match err.downcast::<ArithmeticFailure>() {
            Ok(original) => println!("3 / 0   -> original failure back: {}", original),
            Err(other) => println!("3 / 0   -> unexpected: {}", other),
        }
    }

    println!("\n=== Composition ===\n");
    let halve_then_negate = fallback
        .map_ok(|q: i64| -q)
        .apply_second(2)
        .instrumented_as("halve_then_negate");
    println!("-(9 / 2) -> {:?}", halve_then_negate.apply((9,)));
}
