//! Procedural world generation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::info;

use crate::ai::traits::TraitVector;
use crate::core::config::SimConfig;
use crate::core::error::Result;
use crate::core::types::{ColorTag, NationId, ResourceKind};
use crate::nation::advance::refresh_derived;
use crate::nation::government::GovernmentType;
use crate::nation::model::Nation;
use crate::simulation::world::World;

const NAME_PREFIXES: [&str; 16] = [
    "Vel", "Cor", "Ost", "Mar", "Kal", "Dra", "Sel", "Tor", "Aur", "Bren", "Eld", "Fen", "Gal", "Hal",
    "Iri", "Lun",
];

const NAME_SUFFIXES: [&str; 12] = [
    "aria", "onia", "istan", "land", "mark", "heim", "ovia", "esia", "ador", "ura", "enne", "avia",
];

/// Relative weights of democracy, monarchy, dictatorship and republic
const GOVERNMENT_WEIGHTS: [u32; 4] = [3, 1, 1, 2];

/// Initial relation noise is uniform in [-NOISE, NOISE]
const RELATION_NOISE: f64 = 20.0;

/// Generate a world from config: nations, their starting state, and
/// initial relations. The same config always yields the same world.
pub fn generate_world(config: SimConfig) -> Result<World> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);
    let names = generate_names(config.world.nation_count, &mut rng);

    let mut nations = Vec::with_capacity(config.world.nation_count);
    for (i, name) in names.into_iter().enumerate() {
        let mut nation = generate_nation(NationId(i as u32), name, &mut rng);
        nation.is_player = config.world.player_nation && i == 0;
        nations.push(nation);
    }

    let mut world = World::new(nations, config);
    world.rng = rng;
    initialize_relations(&mut world);

    let standings = world.graph.standings();
    for nation in &mut world.nations {
        let standing = standings.get(&nation.id).copied().unwrap_or_default();
        refresh_derived(nation, &standing, &world.config);
    }

    info!(
        "Generated {} nations (seed {})",
        world.nations.len(),
        world.config.world.seed
    );
    Ok(world)
}

/// Unique prefix + suffix names; falls back to numbered names once the
/// combinations run out
fn generate_names(count: usize, rng: &mut ChaCha8Rng) -> Vec<String> {
    let mut used = BTreeSet::new();
    let mut names = Vec::with_capacity(count);
    let max_attempts = NAME_PREFIXES.len() * NAME_SUFFIXES.len() * 4;

    for i in 0..count {
        let mut name = None;
        for _ in 0..max_attempts {
            let candidate = format!(
                "{}{}",
                NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())],
                NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())]
            );
            if !used.contains(&candidate) {
                name = Some(candidate);
                break;
            }
        }
        let name = name.unwrap_or_else(|| format!("Nation {}", i + 1));
        used.insert(name.clone());
        names.push(name);
    }

    names
}

fn generate_government(rng: &mut ChaCha8Rng) -> GovernmentType {
    let choices: Vec<(GovernmentType, u32)> = GovernmentType::ALL
        .iter()
        .copied()
        .zip(GOVERNMENT_WEIGHTS)
        .collect();
    choices
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(kind, _)| *kind)
        .unwrap_or(GovernmentType::Democracy)
}

fn generate_nation(id: NationId, name: String, rng: &mut ChaCha8Rng) -> Nation {
    let kind = generate_government(rng);
    let population: u64 = rng.gen_range(500_000..=5_000_000);
    let gdp = population as f64 * rng.gen_range(20.0..80.0);

    let mut nation = Nation::new(id, name, kind, population, gdp);
    nation.color = ColorTag([
        rng.gen_range(100..=255),
        rng.gen_range(100..=255),
        rng.gen_range(100..=255),
    ]);
    nation.traits = TraitVector::random(rng);

    let endowment = [
        (ResourceKind::Oil, rng.gen_range(0.0..1.0)),
        (ResourceKind::Minerals, rng.gen_range(0.0..1.0)),
        (ResourceKind::Agriculture, rng.gen_range(0.3..1.0)),
        (ResourceKind::Technology, rng.gen_range(0.2..0.8)),
    ];
    nation.economy.resources = endowment.into_iter().collect();

    nation
}

/// Seed every relationship score from trait compatibility plus noise
fn initialize_relations(world: &mut World) {
    let World {
        nations, graph, rng, ..
    } = world;

    for (i, a) in nations.iter().enumerate() {
        for b in &nations[i + 1..] {
            let noise = rng.gen_range(-RELATION_NOISE..=RELATION_NOISE);
            if let Some(relation) = graph.get_mut(a.id, b.id) {
                relation.adjust_score(a.traits.compatibility(&b.traits) + noise);
            }
        }
    }
}
