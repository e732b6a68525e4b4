//! Queen decision pipeline.
//!
//! A strict priority chain held as data in [`QUEEN_RULES`]. Rules are tried
//! in order and the first one that produces a command wins:
//!
//! 1. `emergency_tower` - enemies close and no towers: tower up the nearest
//!    empty site, but only once the queen is touching it
//! 2. `retreat` - low health: run to the home corner
//! 3. `build_order` - touching a planned site whose structure is wrong
//! 4. `upgrade_mine` - touching our mine that can still grow
//! 5. `upgrade_tower` - touching our tower below the target range
//! 6. `advance_plan` - walk to the farthest-ranked unfinished plan site
//! 7. `home_corner` - nothing left to do

use crate::build_plan::BuildPlan;
use crate::command::QueenCommand;
use crate::math::Position;
use crate::site::{Owner, Site, StructureKind};
use crate::targeting::SiteFilter;
use crate::tuning::Tuning;
use crate::world::WorldState;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Current world.
    pub world: &'a WorldState,
    /// Strategy constants.
    pub tuning: &'a Tuning,
    /// This turn's build plan.
    pub plan: &'a BuildPlan,
    /// The touched site, when it exists in the site table.
    pub touched: Option<&'a Site>,
}

impl<'a> DecisionContext<'a> {
    /// Resolve the touched site and bundle the inputs.
    ///
    /// A touched ID missing from the site table is logged and treated as
    /// touching nothing, which skips the touch-driven rules.
    #[must_use]
    pub fn new(world: &'a WorldState, tuning: &'a Tuning, plan: &'a BuildPlan) -> Self {
        let touched = world.touched_site().and_then(|id| {
            let site = world.site(id);
            if site.is_none() {
                tracing::warn!("Touched site {} is not on the map", id);
            }
            site
        });
        Self {
            world,
            tuning,
            plan,
            touched,
        }
    }

    fn queen_position(&self) -> Position {
        self.world.my_queen().position
    }

    fn home_corner(&self) -> Position {
        let start = self
            .world
            .start_position()
            .unwrap_or_else(|| self.queen_position());
        home_corner(start, self.tuning)
    }
}

/// One entry in the priority chain.
#[derive(Clone, Copy)]
pub struct QueenRule {
    /// Rule name, used in logs.
    pub name: &'static str,
    /// Command when the rule fires.
    pub decide: fn(&DecisionContext<'_>) -> Option<QueenCommand>,
}

impl std::fmt::Debug for QueenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueenRule").field("name", &self.name).finish()
    }
}

/// The queen's rules, highest priority first.
pub const QUEEN_RULES: [QueenRule; 7] = [
    QueenRule {
        name: "emergency_tower",
        decide: emergency_tower,
    },
    QueenRule {
        name: "retreat",
        decide: retreat,
    },
    QueenRule {
        name: "build_order",
        decide: build_order,
    },
    QueenRule {
        name: "upgrade_mine",
        decide: upgrade_mine,
    },
    QueenRule {
        name: "upgrade_tower",
        decide: upgrade_tower,
    },
    QueenRule {
        name: "advance_plan",
        decide: advance_plan,
    },
    QueenRule {
        name: "home_corner",
        decide: move_home,
    },
];

/// The winning rule and its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueenDecision {
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Command to send.
    pub command: QueenCommand,
}

/// Run the chain and return the first command produced.
#[must_use]
pub fn decide_queen(ctx: &DecisionContext<'_>) -> QueenDecision {
    decide_with(&QUEEN_RULES, ctx)
}

/// Run an arbitrary chain. Falls back to the home corner if no rule fires.
#[must_use]
pub fn decide_with(rules: &[QueenRule], ctx: &DecisionContext<'_>) -> QueenDecision {
    rules
        .iter()
        .find_map(|rule| {
            (rule.decide)(ctx).map(|command| QueenDecision {
                rule: rule.name,
                command,
            })
        })
        .unwrap_or_else(|| QueenDecision {
            rule: "home_corner",
            command: QueenCommand::Move(ctx.home_corner()),
        })
}

/// Corner the queen falls back to: the origin when she started on the left
/// half of the map, the far corner otherwise.
#[must_use]
pub fn home_corner(start: Position, tuning: &Tuning) -> Position {
    if start.x > tuning.map_width / 2 {
        Position::new(tuning.map_width, tuning.map_height)
    } else {
        Position::ORIGIN
    }
}

fn emergency_tower(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    let queen = ctx.queen_position();
    if ctx.world.tower_count() > 0 || !ctx.world.enemies_near(queen, ctx.tuning.alert_radius) {
        return None;
    }
    let target = ctx.world.find_closest_site(queen, &SiteFilter::BUILDABLE)?;
    if ctx.world.touched_site() != Some(target.id) {
        return None;
    }
    QueenCommand::build(target.id, StructureKind::Tower)
}

fn retreat(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    (ctx.world.my_queen().health < ctx.tuning.low_health)
        .then(|| QueenCommand::Move(ctx.home_corner()))
}

fn build_order(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    let site = ctx.touched?;
    let (_, _, planned) = ctx
        .plan
        .assignments(ctx.world)
        .find(|(_, id, _)| *id == site.id)?;
    if planned == site.kind {
        return None;
    }

    let kind = if planned == StructureKind::Mine
        && (ctx.world.enemies_near(site.position, ctx.tuning.alert_radius)
            || site.is_depleted(ctx.tuning.mine_depletion_gold))
    {
        StructureKind::Tower
    } else {
        planned
    };
    QueenCommand::build(site.id, kind)
}

fn upgrade_mine(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    let site = ctx.touched?;
    let growable = site.owner == Owner::Friendly
        && site.kind == StructureKind::Mine
        && site.mine_income() < site.max_mine_size
        && !site.is_depleted(ctx.tuning.mine_depletion_gold);
    if !growable {
        return None;
    }
    QueenCommand::build(site.id, StructureKind::Mine)
}

fn upgrade_tower(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    let site = ctx.touched?;
    let short = site.owner == Owner::Friendly
        && site.kind == StructureKind::Tower
        && site.tower_range() < ctx.tuning.min_tower_range;
    if !short {
        return None;
    }
    QueenCommand::build(site.id, StructureKind::Tower)
}

// Scans from the far end of the plan inward.
fn advance_plan(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    ctx.plan
        .assignments(ctx.world)
        .rev()
        .find_map(|(_, id, planned)| {
            let site = ctx.world.site(id)?;
            (site.kind != planned).then_some(QueenCommand::Move(site.position))
        })
}

fn move_home(ctx: &DecisionContext<'_>) -> Option<QueenCommand> {
    Some(QueenCommand::Move(ctx.home_corner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{RawStructure, SiteId, SiteInit, SiteSnapshot};
    use crate::strategy::StrategyMode;
    use crate::unit::{Unit, UnitType};
    use crate::world::TurnSnapshot;

    struct Scene {
        world: WorldState,
        tuning: Tuning,
        sites: Vec<SiteSnapshot>,
        units: Vec<Unit>,
        touched: Option<SiteId>,
    }

    // Three sites 100/300/500 to the right of a queen starting at the origin.
    impl Scene {
        fn new() -> Self {
            let world = WorldState::new((0..3).map(|id| SiteInit {
                id,
                position: Position::new(100 + 200 * id as i32, 0),
                radius: 50,
            }));
            let sites = (0..3)
                .map(|id| SiteSnapshot {
                    id,
                    gold_remaining: 200,
                    max_mine_size: 3,
                    structure: RawStructure::None,
                    owner: Owner::Neutral,
                    param1: -1,
                    param2: -1,
                })
                .collect();
            Self {
                world,
                tuning: Tuning {
                    build_order: vec![
                        StructureKind::Mine,
                        StructureKind::Tower,
                        StructureKind::KnightBarracks,
                    ],
                    ..Tuning::default()
                },
                sites,
                units: vec![
                    Unit::new(Position::ORIGIN, 100, Owner::Friendly, UnitType::Queen),
                    Unit::new(Position::new(1800, 900), 100, Owner::Enemy, UnitType::Queen),
                ],
                touched: None,
            }
        }

        fn set(&mut self, id: usize, structure: RawStructure, owner: Owner, param1: i32, param2: i32) {
            let site = &mut self.sites[id];
            site.structure = structure;
            site.owner = owner;
            site.param1 = param1;
            site.param2 = param2;
        }

        fn absorb(&mut self) {
            self.world
                .begin_turn(&TurnSnapshot {
                    gold: 0,
                    touched_site: self.touched,
                    sites: self.sites.clone(),
                    units: self.units.clone(),
                })
                .unwrap();
        }

        fn decide(&mut self) -> QueenDecision {
            self.absorb();
            let plan = BuildPlan::evaluate(&self.world, &self.tuning, StrategyMode::Default);
            let ctx = DecisionContext::new(&self.world, &self.tuning, &plan);
            decide_queen(&ctx)
        }
    }

    fn enemy_knight_at(x: i32, y: i32) -> Unit {
        Unit::new(Position::new(x, y), 30, Owner::Enemy, UnitType::Knight)
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = QUEEN_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "emergency_tower",
                "retreat",
                "build_order",
                "upgrade_mine",
                "upgrade_tower",
                "advance_plan",
                "home_corner"
            ]
        );
    }

    #[test]
    fn test_touching_first_slot_builds_mine() {
        let mut scene = Scene::new();
        scene.touched = Some(0);
        let decision = scene.decide();
        assert_eq!(decision.rule, "build_order");
        assert_eq!(decision.command.to_string(), "BUILD 0 MINE");
    }

    #[test]
    fn test_mine_slot_under_threat_builds_tower() {
        let mut scene = Scene::new();
        scene.touched = Some(2);
        scene.tuning.build_order[2] = StructureKind::Mine;
        // Near site 2 (500, 0) but outside the alert radius of the queen.
        scene.units.push(enemy_knight_at(560, 0));
        let decision = scene.decide();
        assert_eq!(decision.command.to_string(), "BUILD 2 TOWER");
    }

    #[test]
    fn test_emergency_tower_when_touching_target() {
        let mut scene = Scene::new();
        scene.units[0].position = Position::new(100, 0);
        scene.units.push(enemy_knight_at(150, 50));
        scene.touched = Some(0);
        let decision = scene.decide();
        assert_eq!(decision.rule, "emergency_tower");
        assert_eq!(decision.command.to_string(), "BUILD 0 TOWER");
    }

    #[test]
    fn test_emergency_needs_touch_then_falls_through() {
        let mut scene = Scene::new();
        scene.units[0].position = Position::new(100, 0);
        scene.units[0].health = 5;
        scene.units.push(enemy_knight_at(150, 50));
        scene.touched = None;
        let decision = scene.decide();
        assert_eq!(decision.rule, "retreat");
        assert_eq!(decision.command.to_string(), "MOVE 0 0");
    }

    #[test]
    fn test_emergency_beats_low_health_when_touching() {
        let mut scene = Scene::new();
        scene.units[0].position = Position::new(100, 0);
        scene.units[0].health = 5;
        scene.units.push(enemy_knight_at(150, 50));
        scene.touched = Some(0);
        assert_eq!(scene.decide().rule, "emergency_tower");
    }

    #[test]
    fn test_no_emergency_with_a_tower() {
        let mut scene = Scene::new();
        scene.set(2, RawStructure::Tower, Owner::Friendly, 500, 600);
        scene.units[0].position = Position::new(100, 0);
        scene.units.push(enemy_knight_at(150, 50));
        scene.touched = Some(0);
        // Falls to the build order instead, which wants a mine here but
        // enemies are near the site.
        let decision = scene.decide();
        assert_eq!(decision.rule, "build_order");
        assert_eq!(decision.command.to_string(), "BUILD 0 TOWER");
    }

    #[test]
    fn test_upgrade_mine() {
        let mut scene = Scene::new();
        scene.set(0, RawStructure::Mine, Owner::Friendly, 1, -1);
        scene.touched = Some(0);
        let decision = scene.decide();
        assert_eq!(decision.rule, "upgrade_mine");
        assert_eq!(decision.command.to_string(), "BUILD 0 MINE");
    }

    #[test]
    fn test_full_mine_is_not_upgraded() {
        let mut scene = Scene::new();
        scene.set(0, RawStructure::Mine, Owner::Friendly, 3, -1);
        scene.touched = Some(0);
        assert_eq!(scene.decide().rule, "advance_plan");
    }

    #[test]
    fn test_depleted_mine_is_not_upgraded() {
        let mut scene = Scene::new();
        // Site 2 ranks past the plan, so only the upgrade rules look at it.
        scene.tuning.build_order.truncate(2);
        scene.set(2, RawStructure::Mine, Owner::Friendly, 1, -1);
        scene.touched = Some(2);

        scene.sites[2].gold_remaining = 11;
        assert_eq!(scene.decide().rule, "upgrade_mine");

        scene.sites[2].gold_remaining = 10;
        let decision = scene.decide();
        assert_eq!(decision.rule, "advance_plan");
        assert_eq!(decision.command.to_string(), "MOVE 300 0");
    }

    #[test]
    fn test_depleted_mine_slot_builds_tower() {
        let mut scene = Scene::new();
        scene.sites[0].gold_remaining = 5;
        scene.touched = Some(0);
        let decision = scene.decide();
        assert_eq!(decision.rule, "build_order");
        assert_eq!(decision.command.to_string(), "BUILD 0 TOWER");
    }

    #[test]
    fn test_build_order_swaps_depleted_mine_itself() {
        let mut scene = Scene::new();
        scene.sites[0].gold_remaining = 10;
        scene.touched = Some(0);
        scene.absorb();
        // A plan that still asks for a mine on the exhausted site.
        let plan = BuildPlan::from_slots(vec![StructureKind::Mine, StructureKind::Tower]);
        let ctx = DecisionContext::new(&scene.world, &scene.tuning, &plan);
        let decision = decide_queen(&ctx);
        assert_eq!(decision.rule, "build_order");
        assert_eq!(decision.command.to_string(), "BUILD 0 TOWER");
    }

    #[test]
    fn test_upgrade_tower_until_range() {
        let mut scene = Scene::new();
        scene.set(1, RawStructure::Tower, Owner::Friendly, 300, 499);
        scene.touched = Some(1);
        let decision = scene.decide();
        assert_eq!(decision.rule, "upgrade_tower");
        assert_eq!(decision.command.to_string(), "BUILD 1 TOWER");

        scene.set(1, RawStructure::Tower, Owner::Friendly, 300, 500);
        assert_ne!(scene.decide().rule, "upgrade_tower");
    }

    #[test]
    fn test_advance_plan_scans_from_far_end() {
        let mut scene = Scene::new();
        let decision = scene.decide();
        assert_eq!(decision.rule, "advance_plan");
        assert_eq!(decision.command.to_string(), "MOVE 500 0");

        scene.set(2, RawStructure::Barracks, Owner::Friendly, 0, 0);
        assert_eq!(scene.decide().command.to_string(), "MOVE 300 0");
    }

    #[test]
    fn test_finished_plan_goes_home() {
        let mut scene = Scene::new();
        scene.set(0, RawStructure::Mine, Owner::Friendly, 3, -1);
        scene.set(1, RawStructure::Tower, Owner::Friendly, 300, 600);
        scene.set(2, RawStructure::Barracks, Owner::Friendly, 0, 0);
        let decision = scene.decide();
        assert_eq!(decision.rule, "home_corner");
        assert_eq!(decision.command.to_string(), "MOVE 0 0");
    }

    #[test]
    fn test_unknown_touched_site_skips_touch_rules() {
        let mut scene = Scene::new();
        scene.touched = Some(42);
        assert_eq!(scene.decide().rule, "advance_plan");
    }

    #[test]
    fn test_home_corner_by_start_side() {
        let tuning = Tuning::default();
        assert_eq!(home_corner(Position::new(200, 800), &tuning), Position::ORIGIN);
        assert_eq!(home_corner(Position::new(960, 500), &tuning), Position::ORIGIN);
        assert_eq!(
            home_corner(Position::new(1700, 200), &tuning),
            Position::new(1920, 1000)
        );
    }

    #[test]
    fn test_empty_chain_falls_back_home() {
        let mut scene = Scene::new();
        scene.decide();
        let plan = BuildPlan::evaluate(&scene.world, &scene.tuning, StrategyMode::Default);
        let ctx = DecisionContext::new(&scene.world, &scene.tuning, &plan);
        let decision = decide_with(&[], &ctx);
        assert_eq!(decision.command, QueenCommand::Move(Position::ORIGIN));
    }
}
