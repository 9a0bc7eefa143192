use crate::models::machines::Machine;

/// The rentable machine tiers. This is deployment-time reference data; a new
/// tier means a new release, not a runtime mutation.
pub const MACHINES: [Machine; 10] = [
    Machine { id: "m1", name: "M1", level: 1, price: 1500.0, daily_profit: 100.0, duration_days: 25, max_rentals: 1 },
    Machine { id: "m2", name: "M2", level: 2, price: 5000.0, daily_profit: 200.0, duration_days: 60, max_rentals: 1 },
    Machine { id: "m3", name: "M3", level: 3, price: 10000.0, daily_profit: 400.0, duration_days: 60, max_rentals: 1 },
    Machine { id: "m4", name: "M4", level: 4, price: 20000.0, daily_profit: 800.0, duration_days: 60, max_rentals: 1 },
    Machine { id: "m5", name: "M5", level: 5, price: 35000.0, daily_profit: 1500.0, duration_days: 60, max_rentals: 2 },
    Machine { id: "m6", name: "M6", level: 6, price: 50000.0, daily_profit: 2200.0, duration_days: 60, max_rentals: 2 },
    Machine { id: "m7", name: "M7", level: 7, price: 70000.0, daily_profit: 3000.0, duration_days: 60, max_rentals: 2 },
    Machine { id: "m8", name: "M8", level: 8, price: 100000.0, daily_profit: 4500.0, duration_days: 60, max_rentals: 2 },
    Machine { id: "m9", name: "M9", level: 9, price: 150000.0, daily_profit: 7000.0, duration_days: 60, max_rentals: 2 },
    Machine { id: "m10", name: "M10", level: 10, price: 200000.0, daily_profit: 10000.0, duration_days: 60, max_rentals: 2 },
];

pub fn get(machine_id: &str) -> Option<&'static Machine> {
    MACHINES.iter().find(|m| m.id == machine_id)
}

pub fn all() -> &'static [Machine] {
    &MACHINES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_tiers() {
        let m2 = get("m2").unwrap();
        assert_eq!(m2.price, 5000.0);
        assert_eq!(m2.daily_profit, 200.0);
        assert_eq!(m2.duration_days, 60);
        assert_eq!(m2.max_rentals, 1);

        assert!(get("m11").is_none());
        assert!(get("").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, m) in MACHINES.iter().enumerate() {
            assert!(MACHINES.iter().skip(i + 1).all(|n| n.id != m.id));
        }
    }
}
