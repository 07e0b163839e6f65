//! Computes the monthly bill for a room from its tariff and meter readings.
//!
//! Everything in this module is pure integer arithmetic over amounts in
//! Vietnamese dong, which has no sub-units. Persistence and form handling
//! live elsewhere; callers validate tariff values before they get here.

use std::fmt::Display;

use crate::Error;

/// An amount of money in Vietnamese dong.
pub type Money = i64;

/// The metered utilities that appear on a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utility {
    Electricity,
    Water,
}

impl Display for Utility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Utility::Electricity => write!(f, "electricity"),
            Utility::Water => write!(f, "water"),
        }
    }
}

/// The pricing terms a room is rented under.
///
/// All fields are non-negative amounts in dong. The unit prices are per kWh
/// and per cubic metre, the rest are flat monthly fees. A room's deposit is
/// deliberately not part of the tariff since it never contributes to a
/// monthly total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tariff {
    /// The base monthly rent.
    pub room_price: Money,
    /// The price per kWh of electricity.
    pub elect_unit_price: Money,
    /// The price per cubic metre of water.
    pub water_unit_price: Money,
    /// Flat monthly fee for trash collection.
    pub trash_fee: Money,
    /// Flat monthly fee for parking.
    pub parking_fee: Money,
    /// Flat monthly fee for use of the shared washing machine.
    pub washing_machine_fee: Money,
    /// Flat monthly fee for the elevator.
    pub elevator_fee: Money,
}

/// A pair of cumulative meter readings for one utility over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterReading {
    /// The meter value at the start of the period.
    pub start: i64,
    /// The meter value at the end of the period.
    pub end: i64,
}

/// The line items of a computed monthly bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    /// Electricity consumed over the period, in kWh.
    pub elect_usage: i64,
    /// Water consumed over the period, in cubic metres.
    pub water_usage: i64,
    /// The cost of the electricity consumed.
    pub elect_cost: Money,
    /// The cost of the water consumed.
    pub water_cost: Money,
    /// The sum of rent, metered costs and all flat fees.
    pub total_amount: Money,
}

/// Compute the bill for one period from `tariff` and the meter readings.
///
/// Meters are cumulative counters, so a reading pair where the end is below
/// the start describes negative consumption and is rejected outright rather
/// than clamped.
///
/// # Errors
///
/// Returns [Error::InvalidReading] naming the offending utility if either
/// reading pair has `end < start`, or [Error::AmountOverflow] if a cost or
/// the total does not fit in [Money]. No partial breakdown is produced.
pub fn compute_charges(
    tariff: &Tariff,
    elect: MeterReading,
    water: MeterReading,
) -> Result<Breakdown, Error> {
    if elect.end < elect.start {
        return Err(Error::InvalidReading(Utility::Electricity));
    }

    if water.end < water.start {
        return Err(Error::InvalidReading(Utility::Water));
    }

    let elect_usage = elect.end - elect.start;
    let water_usage = water.end - water.start;
    let elect_cost = elect_usage
        .checked_mul(tariff.elect_unit_price)
        .ok_or(Error::AmountOverflow)?;
    let water_cost = water_usage
        .checked_mul(tariff.water_unit_price)
        .ok_or(Error::AmountOverflow)?;

    let total_amount = tariff
        .room_price
        .checked_add(elect_cost)
        .and_then(|sum| sum.checked_add(water_cost))
        .and_then(|sum| sum.checked_add(tariff.trash_fee))
        .and_then(|sum| sum.checked_add(tariff.parking_fee))
        .and_then(|sum| sum.checked_add(tariff.washing_machine_fee))
        .and_then(|sum| sum.checked_add(tariff.elevator_fee))
        .ok_or(Error::AmountOverflow)?;

    Ok(Breakdown {
        elect_usage,
        water_usage,
        elect_cost,
        water_cost,
        total_amount,
    })
}

/// A previously billed period for a room, reduced to the fields needed to
/// suggest the next period's starting readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PastPeriod {
    /// The billed month, from 1 to 12.
    pub month: u8,
    /// The billed year.
    pub year: i32,
    /// The electricity meter value at the end of the period.
    pub elect_end: i64,
    /// The water meter value at the end of the period.
    pub water_end: i64,
}

/// Suggested starting readings for a room's next bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingSuggestion {
    pub suggested_elect_start: i64,
    pub suggested_water_start: i64,
    pub last_payment_month: u8,
    pub last_payment_year: i32,
}

/// Suggest starting meter readings for the next bill from a room's billing
/// history.
///
/// The period with the greatest (year, month) wins; its end readings become
/// the suggested start readings. Gaps between periods are tolerated since
/// bills may be entered out of order or skipped entirely, so no attempt is
/// made to infer which calendar month comes next.
///
/// Returns [None] for an empty history, which callers should treat as "no
/// suggestion" rather than an error.
pub fn suggest_next_readings(history: &[PastPeriod]) -> Option<ReadingSuggestion> {
    history
        .iter()
        .max_by_key(|period| (period.year, period.month))
        .map(|latest| ReadingSuggestion {
            suggested_elect_start: latest.elect_end,
            suggested_water_start: latest.water_end,
            last_payment_month: latest.month,
            last_payment_year: latest.year,
        })
}

#[cfg(test)]
mod compute_charges_tests {
    use crate::{
        Error,
        billing::{Breakdown, MeterReading, Tariff, Utility, compute_charges},
    };

    fn sample_tariff() -> Tariff {
        Tariff {
            room_price: 2_000_000,
            elect_unit_price: 3_500,
            water_unit_price: 20_000,
            trash_fee: 50_000,
            parking_fee: 0,
            washing_machine_fee: 100_000,
            elevator_fee: 50_000,
        }
    }

    #[test]
    fn computes_known_scenario() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 100,
            end: 150,
        };
        let water = MeterReading { start: 10, end: 15 };

        let breakdown = compute_charges(&tariff, elect, water).unwrap();

        assert_eq!(
            breakdown,
            Breakdown {
                elect_usage: 50,
                water_usage: 5,
                elect_cost: 175_000,
                water_cost: 100_000,
                total_amount: 2_475_000,
            }
        );
    }

    #[test]
    fn zero_usage_charges_fixed_fees_only() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 150,
            end: 150,
        };
        let water = MeterReading { start: 27, end: 27 };

        let breakdown = compute_charges(&tariff, elect, water).unwrap();

        assert_eq!(breakdown.elect_usage, 0);
        assert_eq!(breakdown.water_usage, 0);
        assert_eq!(breakdown.elect_cost, 0);
        assert_eq!(breakdown.water_cost, 0);
        assert_eq!(
            breakdown.total_amount,
            tariff.room_price
                + tariff.trash_fee
                + tariff.parking_fee
                + tariff.washing_machine_fee
                + tariff.elevator_fee
        );
    }

    #[test]
    fn all_zero_tariff_gives_zero_total() {
        let tariff = Tariff::default();
        let elect = MeterReading { start: 0, end: 0 };
        let water = MeterReading { start: 0, end: 0 };

        let breakdown = compute_charges(&tariff, elect, water).unwrap();

        assert_eq!(breakdown.total_amount, 0);
    }

    #[test]
    fn rejects_decreasing_electricity_reading() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 150,
            end: 100,
        };
        let water = MeterReading { start: 20, end: 27 };

        let result = compute_charges(&tariff, elect, water);

        assert_eq!(result, Err(Error::InvalidReading(Utility::Electricity)));
    }

    #[test]
    fn rejects_decreasing_water_reading() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 100,
            end: 150,
        };
        let water = MeterReading { start: 27, end: 20 };

        let result = compute_charges(&tariff, elect, water);

        assert_eq!(result, Err(Error::InvalidReading(Utility::Water)));
    }

    #[test]
    fn electricity_reported_before_water_when_both_invalid() {
        let tariff = sample_tariff();
        let elect = MeterReading { start: 10, end: 5 };
        let water = MeterReading { start: 10, end: 5 };

        let result = compute_charges(&tariff, elect, water);

        assert_eq!(result, Err(Error::InvalidReading(Utility::Electricity)));
    }

    #[test]
    fn total_scales_linearly_with_usage() {
        let tariff = sample_tariff();
        let water = MeterReading { start: 0, end: 0 };

        let one_unit = compute_charges(
            &tariff,
            MeterReading { start: 0, end: 1 },
            water,
        )
        .unwrap();
        let ten_units = compute_charges(
            &tariff,
            MeterReading { start: 0, end: 10 },
            water,
        )
        .unwrap();

        assert_eq!(one_unit.elect_cost, tariff.elect_unit_price);
        assert_eq!(ten_units.elect_cost, 10 * tariff.elect_unit_price);
        assert_eq!(
            ten_units.total_amount - one_unit.total_amount,
            9 * tariff.elect_unit_price
        );
    }

    #[test]
    fn rejects_overflowing_electricity_cost() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 0,
            end: i64::MAX / 2,
        };
        let water = MeterReading { start: 10, end: 15 };

        let result = compute_charges(&tariff, elect, water);

        assert_eq!(result, Err(Error::AmountOverflow));
    }

    #[test]
    fn rejects_overflowing_total() {
        let tariff = Tariff {
            room_price: i64::MAX,
            trash_fee: i64::MAX,
            ..Tariff::default()
        };
        let elect = MeterReading { start: 0, end: 0 };
        let water = MeterReading { start: 0, end: 0 };

        let result = compute_charges(&tariff, elect, water);

        assert_eq!(result, Err(Error::AmountOverflow));
    }

    #[test]
    fn is_deterministic() {
        let tariff = sample_tariff();
        let elect = MeterReading {
            start: 100,
            end: 150,
        };
        let water = MeterReading { start: 20, end: 27 };

        let first = compute_charges(&tariff, elect, water).unwrap();
        let second = compute_charges(&tariff, elect, water).unwrap();

        assert_eq!(first, second);
    }
}
