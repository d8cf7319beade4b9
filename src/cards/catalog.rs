use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub type CardId = u32;

/// Immutable card template. Instances copy these fields and never write back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub attack: i32,
    pub health: i32,
    pub cost: u32,
    #[serde(default)]
    pub art: String,
    #[serde(default)]
    pub lore: String,
}

impl CardDefinition {
    fn builtin(
        id: CardId,
        name: &str,
        (attack, health, cost): (i32, i32, u32),
        lore: &str,
        art: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            attack,
            health,
            cost,
            art: art.to_owned(),
            lore: lore.to_owned(),
        }
    }

    /// Attack may be zero; a card must enter play alive.
    fn validate(&self) -> Result<()> {
        if self.attack < 0 {
            return Err(anyhow!("card {} ({}) has negative attack", self.id, self.name));
        }
        if self.health <= 0 {
            return Err(anyhow!(
                "card {} ({}) must have positive health",
                self.id,
                self.name
            ));
        }
        Ok(())
    }
}

static BUILTIN_CARDS: Lazy<Vec<CardDefinition>> = Lazy::new(|| {
    vec![
        CardDefinition::builtin(
            1,
            "Void Spawn",
            (2, 1, 1),
            "It whispers from the spaces between...",
            "👁️",
        ),
        CardDefinition::builtin(
            2,
            "Tentacled Horror",
            (3, 3, 3),
            "Flesh writhes in impossible geometries.",
            "🐙",
        ),
        CardDefinition::builtin(
            3,
            "Cosmic Dread",
            (1, 5, 2),
            "The stars align for something terrible.",
            "🌌",
        ),
        CardDefinition::builtin(
            4,
            "Elder Sigil",
            (4, 2, 4),
            "Ancient symbols burn with eldritch power.",
            "⚡",
        ),
        CardDefinition::builtin(
            5,
            "Madness Incarnate",
            (5, 1, 3),
            "Sanity crumbles before its presence.",
            "💀",
        ),
    ]
});

/// Static card pool decks are sampled from. Serialized as a bare JSON array; built only
/// through [`CardCatalog::new`] so every definition is playable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
}

impl CardCatalog {
    pub fn new(cards: Vec<CardDefinition>) -> Result<Self> {
        if cards.is_empty() {
            return Err(anyhow!("card catalog must contain at least one card"));
        }
        for card in &cards {
            card.validate()?;
        }
        Ok(Self { cards })
    }

    pub fn builtin() -> Self {
        Self {
            cards: BUILTIN_CARDS.clone(),
        }
    }

    /// Loads a JSON array of card definitions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read card catalog {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid card catalog {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let cards: Vec<CardDefinition> =
            serde_json::from_str(raw).context("card catalog must be a JSON array of cards")?;
        Self::new(cards)
    }

    pub fn cards(&self) -> &[CardDefinition] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
