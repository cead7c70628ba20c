use uuid::Uuid;

use crate::models::{Recipe, Stage};

struct StageSeed(&'static str, f64, u32, &'static str);

struct RecipeSeed {
    name: &'static str,
    brewer: &'static str,
    dose: f64,
    water: f64,
    ratio: &'static str,
    temperature: f64,
    grind_size: &'static str,
    drain_time: u32,
    stages: &'static [StageSeed],
}

const DEFAULT_SEEDS: &[RecipeSeed] = &[
    RecipeSeed {
        name: "Single",
        brewer: "Mr. Clever",
        dose: 10.0,
        water: 150.0,
        ratio: "1:15",
        temperature: 92.0,
        grind_size: "Pourover",
        drain_time: 30,
        stages: &[
            StageSeed("Bloom", 20.0, 30, "-"),
            StageSeed("Brew", 130.0, 120, "Stir after pouring all of the water."),
        ],
    },
    RecipeSeed {
        name: "Single: Ice",
        brewer: "Mr. Clever",
        dose: 13.0,
        water: 150.0,
        ratio: "1:11.54",
        temperature: 92.0,
        grind_size: "Pourover",
        drain_time: 30,
        stages: &[
            StageSeed("Bloom", 26.0, 30, "-"),
            StageSeed("Brew", 124.0, 120, "Stir after pouring all of the water."),
        ],
    },
    RecipeSeed {
        name: "Double",
        brewer: "Mr. Clever",
        dose: 20.0,
        water: 250.0,
        ratio: "1:15",
        temperature: 92.0,
        grind_size: "Pourover",
        drain_time: 30,
        stages: &[
            StageSeed("Bloom", 40.0, 30, "-"),
            StageSeed("Brew", 260.0, 120, "Stir thoroughly after pouring."),
        ],
    },
    RecipeSeed {
        name: "Double: Ice",
        brewer: "Mr. Clever",
        dose: 26.0,
        water: 250.0,
        ratio: "1:11.54",
        temperature: 92.0,
        grind_size: "Pourover",
        drain_time: 30,
        stages: &[
            StageSeed("Bloom", 52.0, 30, "-"),
            StageSeed("Brew", 248.0, 120, "Stir thoroughly after pouring."),
        ],
    },
    RecipeSeed {
        name: "Classic V60",
        brewer: "V60",
        dose: 18.0,
        water: 300.0,
        ratio: "1:16.6",
        temperature: 93.0,
        grind_size: "medium-fine",
        drain_time: 60,
        stages: &[
            StageSeed("Bloom", 50.0, 30, "Pour 50g water, swirl gently."),
            StageSeed("First Pour", 125.0, 45, "Pour to 175g, circular motion."),
            StageSeed("Second Pour", 125.0, 45, "Pour to 300g, gentle pour."),
        ],
    },
    RecipeSeed {
        name: "Aeropress Inverted",
        brewer: "Aeropress",
        dose: 15.0,
        water: 250.0,
        ratio: "1:16.6",
        temperature: 85.0,
        grind_size: "medium",
        drain_time: 90,
        stages: &[StageSeed("Pour", 250.0, 60, "Pour all water.")],
    },
    RecipeSeed {
        name: "Classic Chemex",
        brewer: "Chemex",
        dose: 30.0,
        water: 500.0,
        ratio: "1:16.6",
        temperature: 94.0,
        grind_size: "medium-coarse",
        drain_time: 90,
        stages: &[
            StageSeed("Bloom", 80.0, 45, "Pour 80g water, swirl to saturate."),
            StageSeed("First Pour", 210.0, 60, "Pour to 290g slowly, circular motion."),
            StageSeed("Second Pour", 210.0, 60, "Pour to 500g gently down the middle."),
        ],
    },
    RecipeSeed {
        name: "Kalita 102",
        brewer: "Kalita",
        dose: 20.0,
        water: 320.0,
        ratio: "1:16",
        temperature: 92.0,
        grind_size: "medium",
        drain_time: 60,
        stages: &[
            StageSeed("Bloom", 40.0, 30, "Saturate evenly and swirl gently."),
            StageSeed("Pulse Pour", 140.0, 45, "Pour in slow pulses to 180g."),
            StageSeed("Final Pour", 140.0, 45, "Finish to 320g, steady center pour."),
        ],
    },
    RecipeSeed {
        name: "French Press Standard",
        brewer: "French Press",
        dose: 18.0,
        water: 300.0,
        ratio: "1:16.6",
        temperature: 93.0,
        grind_size: "coarse",
        drain_time: 0,
        stages: &[
            StageSeed("Steep", 300.0, 240, "Pour all water, stir gently, cover."),
            StageSeed("Plunge", 0.0, 30, "Plunge slowly after 4 minutes."),
        ],
    },
];

/// The built-in recipe set, with fresh identifiers on every call.
#[must_use]
pub fn default_recipes() -> Vec<Recipe> {
    DEFAULT_SEEDS
        .iter()
        .map(|seed| Recipe {
            id: Uuid::new_v4().to_string(),
            name: Some(seed.name.to_string()),
            brewer: Some(seed.brewer.to_string()),
            dose: Some(seed.dose),
            water: Some(seed.water),
            ratio: Some(seed.ratio.to_string()),
            temperature: Some(seed.temperature),
            grind_size: Some(seed.grind_size.to_string()),
            drain_time: Some(seed.drain_time),
            stages: seed
                .stages
                .iter()
                .map(|StageSeed(name, water, duration, instructions)| Stage {
                    id: None,
                    name: Some((*name).to_string()),
                    water: Some(*water),
                    duration: Some(*duration),
                    instructions: Some((*instructions).to_string()),
                })
                .collect(),
        })
        .collect()
}
