use super::types::{StatId, StatTable};

/// Experience needed to leave `level`.
pub fn exp_to_next_level(level: i32, exp_per_level: i32) -> i32 {
    level.max(1).saturating_mul(exp_per_level.max(1))
}

/// Adds experience and rolls over into levels while the threshold is met.
/// Returns the number of levels gained.
pub fn grant_experience(stats: &mut StatTable, amount: i32, exp_per_level: i32) -> u32 {
    if amount <= 0 {
        return 0;
    }
    stats.add(StatId::Exp, amount);

    let mut gained = 0;
    loop {
        let level = stats.get(StatId::Level);
        let needed = exp_to_next_level(level, exp_per_level);
        let exp = stats.get(StatId::Exp);
        if exp < needed {
            break;
        }
        stats.set(StatId::Exp, exp - needed);
        stats.set(StatId::Level, level.max(1) + 1);
        gained += 1;
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_level_below_threshold() {
        let mut stats = StatTable::new();
        assert_eq!(grant_experience(&mut stats, 99, 100), 0);
        assert_eq!(stats.get(StatId::Exp), 99);
        assert_eq!(stats.get(StatId::Level), 1);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut stats = StatTable::new();
        assert_eq!(grant_experience(&mut stats, 100, 100), 1);
        assert_eq!(stats.get(StatId::Level), 2);
        assert_eq!(stats.get(StatId::Exp), 0);
    }

    #[test]
    fn test_multiple_levels_carry_remainder() {
        let mut stats = StatTable::new();
        // 100 (1->2) + 200 (2->3) = 300, 50 left over
        assert_eq!(grant_experience(&mut stats, 350, 100), 2);
        assert_eq!(stats.get(StatId::Level), 3);
        assert_eq!(stats.get(StatId::Exp), 50);
    }

    #[test]
    fn test_non_positive_amount_ignored() {
        let mut stats = StatTable::new();
        assert_eq!(grant_experience(&mut stats, 0, 100), 0);
        assert_eq!(grant_experience(&mut stats, -5, 100), 0);
        assert_eq!(stats.get(StatId::Exp), 0);
    }

    #[test]
    fn test_exp_to_next_level_scales() {
        assert_eq!(exp_to_next_level(1, 100), 100);
        assert_eq!(exp_to_next_level(5, 100), 500);
        assert_eq!(exp_to_next_level(0, 100), 100);
    }
}
