//! Name generation utilities

use rand::Rng;

use crate::components::Name;

/// Generate a random villager name
pub fn generate_name(rng: &mut impl Rng) -> Name {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];

    Name::new(given, family)
}

/// Generate a pet name (single word, family left empty)
pub fn generate_pet_name(rng: &mut impl Rng) -> Name {
    let given = PET_NAMES[rng.gen_range(0..PET_NAMES.len())];
    Name::new(given, "")
}

// Sample name lists - would be loaded from data files in production
static GIVEN_NAMES: &[&str] = &[
    "Mara", "Edwin", "Tilly", "Bram", "Odette", "Casper", "June", "Silas", "Petra", "Alden",
    "Wren", "Gideon", "Hazel", "Rufus", "Ada", "Oren", "Maribel", "Cole", "Sage", "Linnea",
];

static FAMILY_NAMES: &[&str] = &[
    "Quill", "Hollis", "Bramblewood", "Ashdown", "Merrin", "Foxglove", "Harrow", "Dunmore",
    "Cresswell", "Thistle", "Wainwright", "Elderberry",
];

static PET_NAMES: &[&str] = &[
    "Biscuit", "Clover", "Pumpkin", "Waffles", "Moss", "Tater", "Juniper", "Pickle",
];
