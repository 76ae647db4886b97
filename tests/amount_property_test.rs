use paytrail::domain::payment::Amount;
use paytrail::error::PaymentError;
use rand::Rng;
use rust_decimal::Decimal;

const CURRENCIES: [&str; 4] = ["USD", "EUR", "JPY", "GBP"];

#[test]
fn test_random_valid_amounts_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let value = Decimal::new(rng.gen_range(0..10_000_000_000i64), rng.gen_range(0..=8));
        let currency = CURRENCIES[rng.gen_range(0..CURRENCIES.len())];

        let amount = Amount::new(value, currency).unwrap();
        assert_eq!(amount.value(), value);
        assert_eq!(amount.currency(), currency);
    }
}

#[test]
fn test_random_negative_amounts_rejected() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let value = Decimal::new(-rng.gen_range(1..10_000_000_000i64), rng.gen_range(0..=8));

        let err = Amount::new(value, "USD").unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(_)));
        assert_eq!(err.to_string(), "amount cannot be negative");
    }
}

#[test]
fn test_empty_currency_rejected_for_any_value() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let value = Decimal::new(rng.gen_range(0..1_000_000i64), 2);
        let err = Amount::new(value, "").unwrap_err();
        assert_eq!(err.to_string(), "currency cannot be empty");
    }
}
