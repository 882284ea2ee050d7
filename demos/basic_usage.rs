// ============================================================================
// Basic Usage Example
// ============================================================================
//
// Run with `--features logging` to see the library's tracing output.

use exact_values::prelude::*;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Exact Values Example ===\n");

    // Packed decimals store any digit/punctuation string
    println!("=== Packed Decimals ===");
    let price = PackedDecimal::of("12.50").unwrap();
    println!("  {} packs into {:02X?}", price, price.as_bytes());
    let phone = PackedDecimal::of("+49/811 32 16-8").unwrap();
    println!("  {} is a number: {}", phone, phone.is_number());
    match phone.add(1) {
        Ok(sum) => println!("  unexpected sum {}", sum),
        Err(e) => println!("  adding to it fails: {}", e),
    }
    let third = PackedDecimal::of("1/3").unwrap();
    println!("  12.50 + 1/3 = {}", price.add(&third).unwrap());

    // Fractions stay exact
    println!("\n=== Fractions ===");
    let fraction: Fraction = "360/1260".parse().unwrap();
    println!("  {} reduces to {}", fraction, fraction.reduce());
    println!(
        "  {} rounded to 6 digits: {}",
        fraction,
        fraction.to_decimal_rounded(6, RoundingMode::HalfEven).unwrap()
    );

    // Money: strict by default, lossy only when asked
    println!("\n=== Money ===");
    let amount = Money::of("19.99", "EUR").unwrap();
    println!("  {} shown short as {}", amount, amount.to_short_string());
    let share = Money::of(10, "EUR").unwrap().divide(3).unwrap();
    println!("  10 EUR / 3 = {} (displayed {})", share, share.to_display_string());

    let two_digits = NumericContext::DEFAULT.with_max_scale(2);
    match Money::of_with_context("1.23456", "EUR", two_digits) {
        Ok(m) => println!("  unexpected {}", m),
        Err(e) => println!("  strict: {}", e),
    }
    println!(
        "  lossy: {}",
        Money::of_rounded("1.23456", "EUR", two_digits).unwrap()
    );

    let config = MoneyConfig::euro();
    let parser = MoneyParser::from_config(&config);
    for text in ["1.234,56", "USD 1,000", "£ 7.5"] {
        match parser.parse(text) {
            Ok(m) => println!("  parsed {:?} as {}", text, m.to_display_string()),
            Err(e) => println!("  cannot parse {:?}: {}", text, e),
        }
    }

    // Check digits and the value registry
    println!("\n=== Validation ===");
    let registry = ValueRegistry::with_core_types();
    for (tag, arg) in [
        ("Luhn", "1234567897"),
        ("Luhn", "2134567897"),
        ("IBAN", "DE89 3704 0044 0532 0130 00"),
        ("Money", "12.50 XYZ"),
    ] {
        match registry.verify(tag, &[arg]) {
            Ok(()) => println!("  {} {:?}: ok", tag, arg),
            Err(e) => println!("  {} {:?}: {}", tag, arg, e),
        }
    }
}
