//! Pure reward and lifecycle arithmetic. Everything here is a function of
//! (ownership rows, catalog, current time) so it can be tested without a
//! database and reused unchanged inside repository transactions.

use chrono::{Duration, NaiveDateTime};

use crate::catalog;
use crate::models::machines::{OwnedMachine, OwnedMachineView};

pub fn expires_at(purchased_at: NaiveDateTime, duration_days: i64) -> NaiveDateTime {
    purchased_at + Duration::days(duration_days)
}

/// A session may only be claimed once its end timestamp has passed.
pub fn session_matured(ends_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    now >= ends_at
}

/// Per-machine rental cap: renting another unit is refused once the user
/// already owns `max_rentals` of that tier.
pub fn rental_capped(owned_count: i64, max_rentals: i64) -> bool {
    owned_count >= max_rentals
}

/// Claim reward: flat base plus the daily profit of every owned machine that
/// has not yet expired. Returns the amount and the contributing machine count.
pub fn session_reward(owned: &[OwnedMachine], base_reward: f64, now: NaiveDateTime) -> (f64, usize) {
    let mut reward = base_reward;
    let mut contributing = 0;

    for row in owned {
        if let Some(machine) = catalog::get(&row.machine_id) {
            if now < expires_at(row.purchased_at, machine.duration_days) {
                reward += machine.daily_profit;
                contributing += 1;
            }
        }
    }

    (reward, contributing)
}

/// Derived lifecycle fields for one owned row, or `None` when the catalog no
/// longer knows the tier.
pub fn owned_view(row: &OwnedMachine, now: NaiveDateTime) -> Option<OwnedMachineView> {
    let machine = catalog::get(&row.machine_id)?;
    let expires = expires_at(row.purchased_at, machine.duration_days);

    let elapsed_days = (now - row.purchased_at).num_days().clamp(0, machine.duration_days);
    let remaining_days = machine.duration_days - elapsed_days;
    let percent_complete = if machine.duration_days == 0 {
        100.0
    } else {
        (elapsed_days as f64 / machine.duration_days as f64 * 100.0).clamp(0.0, 100.0)
    };

    Some(OwnedMachineView {
        id: row.id.clone(),
        machine_id: row.machine_id.clone(),
        name: machine.name.to_string(),
        daily_profit: machine.daily_profit,
        purchased_at: row.purchased_at,
        expires_at: expires,
        elapsed_days,
        remaining_days,
        percent_complete,
        expired: now >= expires,
    })
}

/// Withdrawal tax split: `(tax_amount, net_amount)`, with tax rounded to
/// cents so the two parts always sum back to the requested amount.
pub fn tax_split(amount: f64, tax_rate: f64) -> (f64, f64) {
    let tax = (amount * tax_rate * 100.0).round() / 100.0;
    (tax, amount - tax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn owned(machine_id: &str, purchased_at: NaiveDateTime) -> OwnedMachine {
        OwnedMachine {
            id: "row".into(),
            user_id: "u".into(),
            machine_id: machine_id.into(),
            purchased_at,
        }
    }

    #[test]
    fn reward_is_base_plus_unexpired_profits() {
        let now = at(2025, 3, 10);
        let rows = vec![owned("m2", at(2025, 3, 1)), owned("m1", at(2025, 3, 5))];

        let (reward, count) = session_reward(&rows, 10.0, now);
        assert_eq!(reward, 10.0 + 200.0 + 100.0);
        assert_eq!(count, 2);
    }

    #[test]
    fn reward_with_no_machines_is_base_only() {
        let (reward, count) = session_reward(&[], 10.0, at(2025, 1, 1));
        assert_eq!(reward, 10.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn expired_machines_earn_nothing() {
        // m1 runs 25 days; purchased Jan 1, dead by Feb 1.
        let rows = vec![owned("m1", at(2025, 1, 1))];
        let (reward, count) = session_reward(&rows, 10.0, at(2025, 2, 1));
        assert_eq!(reward, 10.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn unknown_tier_earns_nothing() {
        let rows = vec![owned("m99", at(2025, 1, 1))];
        let (reward, count) = session_reward(&rows, 10.0, at(2025, 1, 2));
        assert_eq!(reward, 10.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn session_matures_only_at_its_end() {
        let ends_at = at(2025, 1, 2);
        assert!(!session_matured(ends_at, at(2025, 1, 1)));
        assert!(!session_matured(ends_at, ends_at - chrono::Duration::seconds(1)));
        assert!(session_matured(ends_at, ends_at));
        assert!(session_matured(ends_at, at(2025, 1, 3)));
    }

    #[test]
    fn rental_cap_blocks_second_unit_of_single_tier() {
        // m1 allows one unit: the first rent passes, the second is capped.
        let m1 = crate::catalog::get("m1").unwrap();
        assert!(!rental_capped(0, m1.max_rentals));
        assert!(rental_capped(1, m1.max_rentals));

        // m5 allows two.
        let m5 = crate::catalog::get("m5").unwrap();
        assert!(!rental_capped(1, m5.max_rentals));
        assert!(rental_capped(2, m5.max_rentals));
    }

    #[test]
    fn owned_view_derives_progress() {
        // m1: 25 day duration, 5 days in.
        let view = owned_view(&owned("m1", at(2025, 1, 1)), at(2025, 1, 6)).unwrap();
        assert_eq!(view.elapsed_days, 5);
        assert_eq!(view.remaining_days, 20);
        assert_eq!(view.percent_complete, 20.0);
        assert!(!view.expired);
        assert_eq!(view.expires_at, at(2025, 1, 26));
    }

    #[test]
    fn owned_view_caps_at_expiry() {
        let view = owned_view(&owned("m1", at(2025, 1, 1)), at(2025, 6, 1)).unwrap();
        assert_eq!(view.elapsed_days, 25);
        assert_eq!(view.remaining_days, 0);
        assert_eq!(view.percent_complete, 100.0);
        assert!(view.expired);
    }

    #[test]
    fn tax_split_sums_back() {
        let (tax, net) = tax_split(500.0, 0.10);
        assert_eq!(tax, 50.0);
        assert_eq!(net, 450.0);
        assert_eq!(tax + net, 500.0);

        let (tax, net) = tax_split(1234.56, 0.10);
        assert_eq!(tax, 123.46);
        assert!((tax + net - 1234.56).abs() < 1e-9);
    }
}
