use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::Money;

/// `NUMERIC(12, 2)` value for an amount.
pub fn money_to_decimal(money: Money) -> BigDecimal {
    BigDecimal::new(money.cents().into(), 2)
}

pub fn money_from_decimal(value: &BigDecimal) -> Result<Money, RepositoryError> {
    (value.clone() * BigDecimal::from(100))
        .with_scale(0)
        .to_i64()
        .and_then(Money::from_cents)
        .ok_or_else(|| {
            tracing::error!("Stored amount is not a valid money value: {value}");
            RepositoryError::DatabaseError
        })
}

pub fn quantity_to_db(quantity: u32) -> Result<i32, RepositoryError> {
    i32::try_from(quantity).map_err(|_| RepositoryError::DatabaseError)
}

pub fn quantity_from_db(quantity: i32) -> Result<u32, RepositoryError> {
    u32::try_from(quantity).map_err(|_| {
        tracing::error!("Stored quantity is negative: {quantity}");
        RepositoryError::DatabaseError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn should_write_money_with_two_decimals() {
        let decimal = money_to_decimal(Money::from_cents(40000).unwrap());
        assert_eq!(decimal, BigDecimal::from_str("400.00").unwrap());
        assert_eq!(decimal.to_string(), "400.00");
    }

    #[test]
    fn should_read_money_from_numeric() {
        let money = money_from_decimal(&BigDecimal::from_str("12.05").unwrap()).unwrap();
        assert_eq!(money.cents(), 1205);
    }

    #[test]
    fn should_reject_negative_amounts() {
        assert!(money_from_decimal(&BigDecimal::from_str("-1.00").unwrap()).is_err());
    }

    #[test]
    fn should_reject_negative_quantity_from_database() {
        assert!(quantity_from_db(-3).is_err());
        assert_eq!(quantity_from_db(3).unwrap(), 3);
    }

    #[test]
    fn should_reject_quantity_outside_integer_column() {
        assert!(quantity_to_db(u32::MAX).is_err());
    }
}
