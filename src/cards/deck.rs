use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use super::catalog::{CardCatalog, CardDefinition};

pub const DECK_SIZE: usize = 20;

pub type InstanceId = Uuid;

/// A card in play. Owned by exactly one zone of one player at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    #[serde(flatten)]
    pub definition: CardDefinition,
    pub instance_id: InstanceId,
    pub current_health: i32,
    #[serde(default)]
    pub just_played: bool,
}

impl CardInstance {
    pub fn new(definition: CardDefinition, instance_id: InstanceId) -> Self {
        let current_health = definition.health;
        Self {
            definition,
            instance_id,
            current_health,
            just_played: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn attack(&self) -> i32 {
        self.definition.attack
    }

    pub fn cost(&self) -> u32 {
        self.definition.cost
    }

    pub fn is_destroyed(&self) -> bool {
        self.current_health <= 0
    }
}

/// Samples the catalog with replacement and returns a shuffled deck. The end of the
/// vector is the top of the deck.
pub fn generate_deck<R: Rng + ?Sized>(catalog: &CardCatalog, rng: &mut R) -> Vec<CardInstance> {
    let mut deck: Vec<CardInstance> = (0..DECK_SIZE)
        .map(|_| {
            let pick = rng.gen_range(0..catalog.len());
            let definition = catalog.cards()[pick].clone();
            CardInstance::new(definition, fresh_instance_id(rng))
        })
        .collect();
    shuffle(&mut deck, rng);
    deck
}

/// Fisher-Yates: walk from the last index down to 1, swapping with j in [0, i].
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

fn fresh_instance_id<R: Rng + ?Sized>(rng: &mut R) -> InstanceId {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}
