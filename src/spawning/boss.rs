//! The stage boss: charge-up, entry path, lifetime and defeat.

use crate::core::config::BossConfig;
use crate::core::geometry::Vec2;
use crate::enemies::{advance_boss, Enemy, EnemyTemplate, SpawnScaling};
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPhase {
    /// No boss this run (cleared stage or no boss template).
    Dormant,
    Charging { elapsed: f64 },
    Moving { lifetime: f64 },
    Defeated,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossEvent {
    Spawned { position: Vec2, target: Vec2 },
    Expired,
}

#[derive(Debug, Clone)]
pub struct BossController {
    phase: BossPhase,
    template: Option<EnemyTemplate>,
    boss: Option<Enemy>,
}

impl Default for BossController {
    fn default() -> Self {
        Self::new()
    }
}

impl BossController {
    pub fn new() -> Self {
        Self {
            phase: BossPhase::Dormant,
            template: None,
            boss: None,
        }
    }

    /// Arms the controller for a run. Bosses only appear on the highest
    /// unlocked stage.
    pub fn start(&mut self, template: Option<EnemyTemplate>, stage: u32, unlocked_stage: u32) {
        self.boss = None;
        self.template = template;
        self.phase = if stage == unlocked_stage && self.template.is_some() {
            BossPhase::Charging { elapsed: 0.0 }
        } else {
            BossPhase::Dormant
        };
    }

    pub fn stop(&mut self) {
        self.boss = None;
        self.phase = BossPhase::Dormant;
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn is_defeated(&self) -> bool {
        self.phase == BossPhase::Defeated
    }

    /// Progress-bar fill: charge progress while charging, full otherwise.
    pub fn fill_ratio(&self, config: &BossConfig) -> f32 {
        match self.phase {
            BossPhase::Charging { elapsed } => {
                (elapsed / config.charge_seconds).clamp(0.0, 1.0) as f32
            }
            _ => 1.0,
        }
    }

    /// The boss while it is in play and alive.
    pub fn boss(&self) -> Option<&Enemy> {
        self.boss.as_ref().filter(|b| b.is_alive())
    }

    pub fn boss_mut(&mut self) -> Option<&mut Enemy> {
        self.boss.as_mut().filter(|b| b.is_alive())
    }

    pub fn tick(
        &mut self,
        dt: f64,
        config: &BossConfig,
        scaling: SpawnScaling,
        rng: &mut impl Rng,
    ) -> Option<BossEvent> {
        match self.phase {
            BossPhase::Charging { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed < config.charge_seconds {
                    self.phase = BossPhase::Charging { elapsed };
                    return None;
                }
                self.spawn(config, scaling, rng)
            }
            BossPhase::Moving { lifetime } => {
                let lifetime = lifetime + dt;
                if let Some(boss) = self.boss.as_mut() {
                    advance_boss(boss, dt, config.move_speed, config.arrival_distance);
                }
                if lifetime >= config.lifetime_seconds {
                    info!(lifetime, "boss expired");
                    self.boss = None;
                    self.phase = BossPhase::Expired;
                    return Some(BossEvent::Expired);
                }
                self.phase = BossPhase::Moving { lifetime };
                None
            }
            BossPhase::Dormant | BossPhase::Defeated | BossPhase::Expired => None,
        }
    }

    fn spawn(
        &mut self,
        config: &BossConfig,
        scaling: SpawnScaling,
        rng: &mut impl Rng,
    ) -> Option<BossEvent> {
        let template = self.template.clone()?;
        let (from, to) = if rng.gen_bool(0.5) {
            (&config.start_points_a, &config.start_points_b)
        } else {
            (&config.start_points_b, &config.start_points_a)
        };
        if from.is_empty() || to.is_empty() {
            self.phase = BossPhase::Dormant;
            return None;
        }
        let position = from[rng.gen_range(0..from.len())];
        let target = to[rng.gen_range(0..to.len())];

        let mut boss = Enemy::boss(
            template,
            config.enrage_health_fraction,
            config.enrage_reflection_multiplier,
        );
        boss.position = position;
        boss.spawn(target, scaling.health, scaling.reflection, 0.0);
        info!(
            boss = %boss.template.id,
            health = boss.max_health,
            "boss spawned"
        );
        self.boss = Some(boss);
        self.phase = BossPhase::Moving { lifetime: 0.0 };
        Some(BossEvent::Spawned { position, target })
    }

    /// Marks the boss defeated once its health hit zero and hands back the
    /// dead instance for payouts.
    pub fn take_defeated(&mut self) -> Option<Enemy> {
        if !matches!(self.phase, BossPhase::Moving { .. }) {
            return None;
        }
        if !self.boss.as_ref().is_some_and(|b| b.is_dying()) {
            return None;
        }
        self.phase = BossPhase::Defeated;
        info!("boss defeated");
        self.boss.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CurrencyId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn template() -> EnemyTemplate {
        EnemyTemplate::new("boss", 100, CurrencyId::PinkBits, 10)
    }

    fn config() -> BossConfig {
        BossConfig {
            charge_seconds: 30.0,
            lifetime_seconds: 180.0,
            ..BossConfig::default()
        }
    }

    fn charged(rng: &mut ChaCha8Rng) -> BossController {
        let mut ctl = BossController::new();
        ctl.start(Some(template()), 2, 2);
        let event = ctl.tick(30.0, &config(), SpawnScaling::default(), rng);
        assert!(matches!(event, Some(BossEvent::Spawned { .. })));
        ctl
    }

    #[test]
    fn test_cleared_stage_is_dormant_and_full() {
        let mut ctl = BossController::new();
        ctl.start(Some(template()), 1, 3);
        assert_eq!(ctl.phase(), BossPhase::Dormant);
        assert_eq!(ctl.fill_ratio(&config()), 1.0);
    }

    #[test]
    fn test_no_template_is_dormant() {
        let mut ctl = BossController::new();
        ctl.start(None, 1, 1);
        assert_eq!(ctl.phase(), BossPhase::Dormant);
    }

    #[test]
    fn test_charge_fill_ratio() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctl = BossController::new();
        ctl.start(Some(template()), 1, 1);
        assert_eq!(ctl.fill_ratio(&config()), 0.0);
        assert!(ctl.tick(15.0, &config(), SpawnScaling::default(), &mut rng).is_none());
        assert!((ctl.fill_ratio(&config()) - 0.5).abs() < 1e-6);
        assert!(ctl.boss().is_none());
    }

    #[test]
    fn test_spawns_on_path_between_point_lists() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ctl = charged(&mut rng);
        let boss = ctl.boss().unwrap();
        let cfg = config();
        let on_a = |p: Vec2| cfg.start_points_a.contains(&p);
        let on_b = |p: Vec2| cfg.start_points_b.contains(&p);
        assert!((on_a(boss.position) && on_b(boss.target)) || (on_b(boss.position) && on_a(boss.target)));
        assert!(boss.is_boss);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ctl = charged(&mut rng);
        assert!(ctl.tick(179.0, &config(), SpawnScaling::default(), &mut rng).is_none());
        assert_eq!(
            ctl.tick(1.0, &config(), SpawnScaling::default(), &mut rng),
            Some(BossEvent::Expired)
        );
        assert_eq!(ctl.phase(), BossPhase::Expired);
        assert!(ctl.boss().is_none());
    }

    #[test]
    fn test_defeat() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ctl = charged(&mut rng);
        assert!(ctl.take_defeated().is_none());
        ctl.boss_mut().unwrap().take_damage(1000);
        let dead = ctl.take_defeated().unwrap();
        assert!(dead.is_dying());
        assert!(ctl.is_defeated());
        assert!(ctl.boss().is_none());
        // A defeated boss never expires.
        assert!(ctl.tick(500.0, &config(), SpawnScaling::default(), &mut rng).is_none());
        assert!(ctl.is_defeated());
    }

    #[test]
    fn test_health_scaled_by_stage() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ctl = BossController::new();
        ctl.start(Some(template()), 1, 1);
        let scaling = SpawnScaling {
            health: 3.0,
            reflection: 1.0,
        };
        ctl.tick(30.0, &config(), scaling, &mut rng);
        assert_eq!(ctl.boss().unwrap().max_health, 300);
    }
}
