//! Integration tests for the tick driver
//!
//! These tests drive the public API end-to-end:
//! - intent submission and tick-boundary application
//! - diplomatic scenarios (trade deal, war)
//! - determinism, snapshot idempotence and step batching
//! - relationship symmetry
//! - the clock state machine

use std::collections::BTreeSet;

use nation_sim::core::error::IntentRejection;
use nation_sim::core::types::{NationId, Sector};
use nation_sim::diplomacy::{DiplomaticAction, RelationStatus};
use nation_sim::events::{EventCatalog, EventSystem, LogKind};
use nation_sim::nation::{GovernmentType, Nation};
use nation_sim::simulation::ClockState;
use nation_sim::{Intent, SimConfig, SimError, Simulation, World};

const A: NationId = NationId(0);
const B: NationId = NationId(1);

fn quiet_config() -> SimConfig {
    let mut config = SimConfig::with_seed(2024);
    config.events.enabled = false;
    config.ai.enabled = false;
    config
}

/// Two identical neutral nations with a relation score of zero
fn two_nation_sim() -> Simulation {
    let nations = vec![
        Nation::new(A, "Aldoria", GovernmentType::Democracy, 1_000_000, 5.0e7),
        Nation::new(B, "Borvia", GovernmentType::Republic, 1_000_000, 5.0e7),
    ];
    Simulation::new(World::new(nations, quiet_config()))
}

fn propose(actor: NationId, target: NationId, action: DiplomaticAction) -> Intent {
    Intent::ProposeAction {
        actor,
        target,
        action,
    }
}

// ============================================================================
// Diplomatic Scenarios
// ============================================================================

#[test]
fn test_trade_deal_scenario() {
    let mut with_deal = two_nation_sim();
    let mut without_deal = two_nation_sim();

    let relation = with_deal.world().graph.get(A, B).unwrap();
    assert_eq!(relation.status, RelationStatus::Neutral);
    assert_eq!(relation.score, 0.0);

    with_deal
        .submit(propose(A, B, DiplomaticAction::TradeDeal))
        .unwrap();
    with_deal.step().unwrap();
    without_deal.step().unwrap();

    let relation = with_deal.world().graph.get(A, B).unwrap();
    assert_eq!(relation.status, RelationStatus::TradePartner);
    assert!((relation.score - 5.0).abs() < 0.1);

    for id in [A, B] {
        let traded = with_deal.world().nation(id).unwrap().economy.gdp;
        let isolated = without_deal.world().nation(id).unwrap().economy.gdp;
        assert!(traded > isolated, "{}: {} <= {}", id, traded, isolated);
        assert_eq!(
            with_deal.world().nation(id).unwrap().status.standing.trade_partners,
            1
        );
    }
}

#[test]
fn test_declare_war_twice_rejected() {
    let mut sim = two_nation_sim();
    sim.submit(propose(A, B, DiplomaticAction::DeclareWar))
        .unwrap();
    sim.step().unwrap();

    let relation = sim.world().graph.get(A, B).unwrap();
    assert_eq!(relation.status, RelationStatus::AtWar);
    assert!(sim.world().nation(A).unwrap().is_at_war());
    assert!(sim.world().nation(B).unwrap().is_at_war());

    let before = sim.snapshot();
    let err = sim
        .submit(propose(A, B, DiplomaticAction::DeclareWar))
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Rejected(IntentRejection::AlreadyAtWar)
    ));
    assert!(sim.pending().is_empty());
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn test_peace_ends_war_and_blocks_redeclaration() {
    let mut sim = two_nation_sim();
    sim.submit(propose(A, B, DiplomaticAction::DeclareWar))
        .unwrap();
    sim.step().unwrap();
    sim.submit(propose(B, A, DiplomaticAction::PeaceTreaty))
        .unwrap();
    sim.step().unwrap();

    assert!(!sim.world().graph.get(A, B).unwrap().at_war);
    let err = sim
        .submit(propose(A, B, DiplomaticAction::DeclareWar))
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Rejected(IntentRejection::TruceActive)
    ));
}

#[test]
fn test_self_target_rejected() {
    let mut sim = two_nation_sim();
    let err = sim
        .submit(propose(A, A, DiplomaticAction::TradeDeal))
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Rejected(IntentRejection::SelfTarget)
    ));
}

#[test]
fn test_unknown_nation_is_an_error() {
    let mut sim = two_nation_sim();
    let err = sim
        .submit(propose(A, NationId(42), DiplomaticAction::ImproveRelations))
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownNation(NationId(42))));
}

#[test]
fn test_diplomacy_is_logged() {
    let mut sim = two_nation_sim();
    sim.submit(propose(A, B, DiplomaticAction::ImproveRelations))
        .unwrap();
    sim.step().unwrap();

    let entry = sim.world().log.latest().unwrap();
    assert_eq!(entry.kind, LogKind::Diplomacy);
    assert_eq!(entry.nations, vec![A, B]);
    assert!(entry.message.contains("Aldoria"));
}

// ============================================================================
// Economic Intents
// ============================================================================

#[test]
fn test_full_tax_without_spending() {
    let mut sim = two_nation_sim();
    let treasury = sim.world().nation(A).unwrap().economy.treasury;
    let happiness = sim.world().nation(A).unwrap().population.happiness;

    sim.submit(Intent::SetTaxRate { nation: A, rate: 1.0 })
        .unwrap();
    sim.submit(Intent::SetBudgetShares {
        nation: A,
        shares: Sector::ALL.iter().map(|&s| (s, 0.0)).collect(),
    })
    .unwrap();
    let report = sim.step().unwrap();
    assert_eq!(report.intents_applied, 2);

    let nation = sim.world().nation(A).unwrap();
    assert!(nation.economy.treasury > treasury);
    assert!(nation.population.happiness < happiness);
}

#[test]
fn test_government_change_applies() {
    let mut sim = two_nation_sim();
    sim.submit(Intent::ChangeGovernment {
        nation: A,
        government: GovernmentType::Monarchy,
    })
    .unwrap();
    let report = sim.step().unwrap();

    assert_eq!(
        report.government_changes,
        vec![(A, GovernmentType::Democracy, GovernmentType::Monarchy)]
    );
    let nation = sim.world().nation(A).unwrap();
    assert_eq!(nation.government.kind, GovernmentType::Monarchy);
    assert_eq!(nation.politics.election_countdown, None);
}

// ============================================================================
// Determinism and Snapshots
// ============================================================================

#[test]
fn test_same_seed_same_trajectory() {
    let mut a = Simulation::from_config(SimConfig::with_seed(7)).unwrap();
    let mut b = Simulation::from_config(SimConfig::with_seed(7)).unwrap();

    let reports_a = a.step_many(60).unwrap();
    let reports_b = b.step_many(60).unwrap();

    assert_eq!(reports_a, reports_b);
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.snapshot().to_json(), b.snapshot().to_json());
}

#[test]
fn test_snapshot_idempotent() {
    let mut sim = Simulation::from_config(SimConfig::with_seed(11)).unwrap();
    sim.step_many(5).unwrap();

    let first = sim.snapshot();
    let second = sim.snapshot();
    assert_eq!(first, second);
    assert_eq!(first.tick, 5);
}

#[test]
fn test_step_batching_equivalence() {
    let mut single = Simulation::from_config(SimConfig::with_seed(42)).unwrap();
    let mut batched = Simulation::from_config(SimConfig::with_seed(42)).unwrap();
    single.set_speed(1.0).unwrap();

    for _ in 0..100 {
        single.step().unwrap();
    }
    batched.step_many(100).unwrap();

    assert_eq!(single.snapshot(), batched.snapshot());
}

#[test]
fn test_relationship_symmetry() {
    let mut sim = Simulation::from_config(SimConfig::with_seed(3)).unwrap();
    sim.step_many(24).unwrap();

    let world = sim.world();
    let n = world.nations.len();
    assert_eq!(world.graph.len(), n * (n - 1) / 2);

    let mut pairs = BTreeSet::new();
    for relation in world.graph.iter() {
        assert!(pairs.insert(relation.pair), "duplicate record");
    }

    for a in &world.nations {
        for b in &world.nations {
            if a.id == b.id {
                assert!(world.graph.get(a.id, b.id).is_none());
                continue;
            }
            let ab = world.graph.get(a.id, b.id).unwrap();
            let ba = world.graph.get(b.id, a.id).unwrap();
            assert!(std::ptr::eq(ab, ba));
        }
    }
}

#[test]
fn test_log_stays_bounded() {
    let mut config = SimConfig::with_seed(8);
    config.events.log_capacity = 10;
    let mut sim = Simulation::from_config(config).unwrap();

    sim.step_many(120).unwrap();
    assert!(sim.world().log.len() <= 10);
    assert!(sim.snapshot().recent_log.len() <= 10);
}

#[test]
fn test_custom_event_catalog() {
    let catalog = EventCatalog::parse_toml(
        r#"
        [[events]]
        id = "windfall"
        name = "Windfall"
        category = "Economic"
        probability = 1.0
        effects = [{ type = "Additive", field = "Treasury", amount = 1000.0 }]
        "#,
    )
    .unwrap();

    let mut config = quiet_config();
    config.events.enabled = true;
    config.events.stability_scaling = 0.0;
    let nations = vec![
        Nation::new(A, "Aldoria", GovernmentType::Democracy, 1_000_000, 5.0e7),
        Nation::new(B, "Borvia", GovernmentType::Republic, 1_000_000, 5.0e7),
    ];
    let mut world = World::new(nations, config);
    world.events = EventSystem::new(catalog);
    let mut sim = Simulation::new(world);

    let report = sim.step().unwrap();
    assert_eq!(report.events_fired(), 2);
    assert!(report.events.iter().all(|e| e.template_id == "windfall"));
}

// ============================================================================
// Clock
// ============================================================================

#[test]
fn test_clock_controls() {
    let mut sim = two_nation_sim();
    assert_eq!(sim.state(), ClockState::Stopped);
    assert!(sim.advance_real_time(3.0).unwrap().is_empty());

    sim.start();
    assert_eq!(sim.state(), ClockState::Running);
    sim.set_speed(3.0).unwrap();
    assert_eq!(sim.advance_real_time(1.0).unwrap().len(), 3);

    sim.pause();
    assert_eq!(sim.state(), ClockState::Paused);
    assert!(sim.advance_real_time(1.0).unwrap().is_empty());

    sim.resume();
    assert_eq!(sim.state(), ClockState::Running);
    assert!(sim.set_speed(-1.0).is_err());
    assert_eq!(sim.speed(), 3.0);
    assert_eq!(sim.tick(), 3);
}

#[test]
fn test_manual_step_ignores_clock_state() {
    let mut sim = two_nation_sim();
    sim.step().unwrap();
    sim.start();
    sim.pause();
    sim.step().unwrap();
    assert_eq!(sim.tick(), 2);
}
