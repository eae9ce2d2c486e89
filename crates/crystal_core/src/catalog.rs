//! Display names for species, moves and items.
//!
//! Species and move names follow the internal Gen II index order. Item tables
//! only cover the ids the editor presets touch; anything else renders by id.

pub const SPECIES_COUNT: usize = 251;
pub const SUICUNE: u8 = 245;

pub const MASTER_BALL: u8 = 0x01;
pub const RARE_CANDY: u8 = 0x08;

#[rustfmt::skip]
const SPECIES_NAMES: [&str; SPECIES_COUNT] = [
    "Bulbasaur", "Ivysaur", "Venusaur", "Charmander", "Charmeleon", "Charizard", "Squirtle",
    "Wartortle", "Blastoise", "Caterpie", "Metapod", "Butterfree", "Weedle", "Kakuna",
    "Beedrill", "Pidgey", "Pidgeotto", "Pidgeot", "Rattata", "Raticate", "Spearow", "Fearow",
    "Ekans", "Arbok", "Pikachu", "Raichu", "Sandshrew", "Sandslash", "Nidoran♀", "Nidorina",
    "Nidoqueen", "Nidoran♂", "Nidorino", "Nidoking", "Clefairy", "Clefable", "Vulpix",
    "Ninetales", "Jigglypuff", "Wigglytuff", "Zubat", "Golbat", "Oddish", "Gloom", "Vileplume",
    "Paras", "Parasect", "Venonat", "Venomoth", "Diglett", "Dugtrio", "Meowth", "Persian",
    "Psyduck", "Golduck", "Mankey", "Primeape", "Growlithe", "Arcanine", "Poliwag",
    "Poliwhirl", "Poliwrath", "Abra", "Kadabra", "Alakazam", "Machop", "Machoke", "Machamp",
    "Bellsprout", "Weepinbell", "Victreebel", "Tentacool", "Tentacruel", "Geodude", "Graveler",
    "Golem", "Ponyta", "Rapidash", "Slowpoke", "Slowbro", "Magnemite", "Magneton", "Farfetchd",
    "Doduo", "Dodrio", "Seel", "Dewgong", "Grimer", "Muk", "Shellder", "Cloyster", "Gastly",
    "Haunter", "Gengar", "Onix", "Drowzee", "Hypno", "Krabby", "Kingler", "Voltorb",
    "Electrode", "Exeggcute", "Exeggutor", "Cubone", "Marowak", "Hitmonlee", "Hitmonchan",
    "Lickitung", "Koffing", "Weezing", "Rhyhorn", "Rhydon", "Chansey", "Tangela", "Kangaskhan",
    "Horsea", "Seadra", "Goldeen", "Seaking", "Staryu", "Starmie", "Mr. Mime", "Scyther",
    "Jynx", "Electabuzz", "Magmar", "Pinsir", "Tauros", "Magikarp", "Gyarados", "Lapras",
    "Ditto", "Eevee", "Vaporeon", "Jolteon", "Flareon", "Porygon", "Omanyte", "Omastar",
    "Kabuto", "Kabutops", "Aerodactyl", "Snorlax", "Articuno", "Zapdos", "Moltres", "Dratini",
    "Dragonair", "Dragonite", "Mewtwo", "Mew", "Chikorita", "Bayleef", "Meganium", "Cyndaquil",
    "Quilava", "Typhlosion", "Totodile", "Croconaw", "Feraligatr", "Sentret", "Furret",
    "Hoothoot", "Noctowl", "Ledyba", "Ledian", "Spinarak", "Ariados", "Crobat", "Chinchou",
    "Lanturn", "Pichu", "Cleffa", "Igglybuff", "Togepi", "Togetic", "Natu", "Xatu", "Mareep",
    "Flaaffy", "Ampharos", "Bellossom", "Marill", "Azumarill", "Sudowoodo", "Politoed",
    "Hoppip", "Skiploom", "Jumpluff", "Aipom", "Sunkern", "Sunflora", "Yanma", "Wooper",
    "Quagsire", "Espeon", "Umbreon", "Murkrow", "Slowking", "Misdreavus", "Unown", "Wobbuffet",
    "Girafarig", "Pineco", "Forretress", "Dunsparce", "Gligar", "Steelix", "Snubbull",
    "Granbull", "Qwilfish", "Scizor", "Shuckle", "Heracross", "Sneasel", "Teddiursa",
    "Ursaring", "Slugma", "Magcargo", "Swinub", "Piloswine", "Corsola", "Remoraid",
    "Octillery", "Delibird", "Mantine", "Skarmory", "Houndour", "Houndoom", "Kingdra",
    "Phanpy", "Donphan", "Porygon2", "Stantler", "Smeargle", "Tyrogue", "Hitmontop",
    "Smoochum", "Elekid", "Magby", "Miltank", "Blissey", "Raikou", "Entei", "Suicune",
    "Larvitar", "Pupitar", "Tyranitar", "Lugia", "Ho-Oh", "Celebi",
];

#[rustfmt::skip]
const MOVE_NAMES: [&str; 251] = [
    "Pound", "Karate Chop", "Double Slap", "Comet Punch", "Mega Punch", "Pay Day",
    "Fire Punch", "Ice Punch", "Thunder Punch", "Scratch", "Vice Grip", "Guillotine",
    "Razor Wind", "Swords Dance", "Cut", "Gust", "Wing Attack", "Whirlwind", "Fly", "Bind",
    "Slam", "Vine Whip", "Stomp", "Double Kick", "Mega Kick", "Jump Kick", "Rolling Kick",
    "Sand Attack", "Headbutt", "Horn Attack", "Fury Attack", "Horn Drill", "Tackle",
    "Body Slam", "Wrap", "Take Down", "Thrash", "Double-Edge", "Tail Whip", "Poison Sting",
    "Twineedle", "Pin Missile", "Leer", "Bite", "Growl", "Roar", "Sing", "Supersonic",
    "Sonic Boom", "Disable", "Acid", "Ember", "Flamethrower", "Mist", "Water Gun",
    "Hydro Pump", "Surf", "Ice Beam", "Blizzard", "Psybeam", "Bubble Beam", "Aurora Beam",
    "Hyper Beam", "Peck", "Drill Peck", "Submission", "Low Kick", "Counter", "Seismic Toss",
    "Strength", "Absorb", "Mega Drain", "Leech Seed", "Growth", "Razor Leaf", "Solar Beam",
    "Poison Powder", "Stun Spore", "Sleep Powder", "Petal Dance", "String Shot", "Dragon Rage",
    "Fire Spin", "Thunder Shock", "Thunderbolt", "Thunder Wave", "Thunder", "Rock Throw",
    "Earthquake", "Fissure", "Dig", "Toxic", "Confusion", "Psychic", "Hypnosis", "Meditate",
    "Agility", "Quick Attack", "Rage", "Teleport", "Night Shade", "Mimic", "Screech",
    "Double Team", "Recover", "Harden", "Minimize", "Smokescreen", "Confuse Ray", "Withdraw",
    "Defense Curl", "Barrier", "Light Screen", "Haze", "Reflect", "Focus Energy", "Bide",
    "Metronome", "Mirror Move", "Self-Destruct", "Egg Bomb", "Lick", "Smog", "Sludge",
    "Bone Club", "Fire Blast", "Waterfall", "Clamp", "Swift", "Skull Bash", "Spike Cannon",
    "Constrict", "Amnesia", "Kinesis", "Soft-Boiled", "High Jump Kick", "Glare", "Dream Eater",
    "Poison Gas", "Barrage", "Leech Life", "Lovely Kiss", "Sky Attack", "Transform", "Bubble",
    "Dizzy Punch", "Spore", "Flash", "Psywave", "Splash", "Acid Armor", "Crabhammer",
    "Explosion", "Fury Swipes", "Bonemerang", "Rest", "Rock Slide", "Hyper Fang", "Sharpen",
    "Conversion", "Tri Attack", "Super Fang", "Slash", "Substitute", "Struggle", "Sketch",
    "Triple Kick", "Thief", "Spider Web", "Mind Reader", "Nightmare", "Flame Wheel", "Snore",
    "Curse", "Flail", "Conversion 2", "Aeroblast", "Cotton Spore", "Reversal", "Spite",
    "Powder Snow", "Protect", "Mach Punch", "Scary Face", "Faint Attack", "Sweet Kiss",
    "Belly Drum", "Sludge Bomb", "Mud-Slap", "Octazooka", "Spikes", "Zap Cannon", "Foresight",
    "Destiny Bond", "Perish Song", "Icy Wind", "Detect", "Bone Rush", "Lock-On", "Outrage",
    "Sandstorm", "Giga Drain", "Endure", "Charm", "Rollout", "False Swipe", "Swagger",
    "Milk Drink", "Spark", "Fury Cutter", "Steel Wing", "Mean Look", "Attract", "Sleep Talk",
    "Heal Bell", "Return", "Present", "Frustration", "Safeguard", "Pain Split", "Sacred Fire",
    "Magnitude", "Dynamic Punch", "Megahorn", "Dragon Breath", "Baton Pass", "Encore",
    "Pursuit", "Rapid Spin", "Sweet Scent", "Iron Tail", "Metal Claw", "Vital Throw",
    "Morning Sun", "Synthesis", "Moonlight", "Hidden Power", "Cross Chop", "Twister",
    "Rain Dance", "Sunny Day", "Crunch", "Mirror Coat", "Psych Up", "Extreme Speed",
    "Ancient Power", "Shadow Ball", "Future Sight", "Rock Smash", "Whirlpool", "Beat Up",
];

struct WellKnownItem {
    id: u8,
    name: &'static str,
}

#[rustfmt::skip]
const BALLS: &[WellKnownItem] = &[
    WellKnownItem { id: 0x01, name: "Master Ball" },
    WellKnownItem { id: 0x02, name: "Ultra Ball" },
    WellKnownItem { id: 0x03, name: "Great Ball" },
    WellKnownItem { id: 0x04, name: "Poke Ball" },
    WellKnownItem { id: 0x07, name: "Safari Ball" },
    WellKnownItem { id: 0xA0, name: "Level Ball" },
    WellKnownItem { id: 0xA1, name: "Lure Ball" },
    WellKnownItem { id: 0xA2, name: "Fast Ball" },
    WellKnownItem { id: 0xA3, name: "Heavy Ball" },
    WellKnownItem { id: 0xA4, name: "Friend Ball" },
    WellKnownItem { id: 0xA5, name: "Moon Ball" },
    WellKnownItem { id: 0xA6, name: "Love Ball" },
];

#[rustfmt::skip]
const ITEMS: &[WellKnownItem] = &[
    // Medicine
    WellKnownItem { id: 0x0D, name: "Max Potion" },
    WellKnownItem { id: 0x0E, name: "Full Restore" },
    WellKnownItem { id: 0x10, name: "Max Revive" },
    WellKnownItem { id: 0x12, name: "Max Elixir" },
    WellKnownItem { id: 0x19, name: "Full Heal" },

    // Stat boosters
    WellKnownItem { id: 0x08, name: "Rare Candy" },
    WellKnownItem { id: 0x2D, name: "HP Up" },
    WellKnownItem { id: 0x2E, name: "Protein" },
    WellKnownItem { id: 0x2F, name: "Iron" },
    WellKnownItem { id: 0x30, name: "Carbos" },
    WellKnownItem { id: 0x31, name: "Calcium" },
    WellKnownItem { id: 0x4A, name: "PP Max" },

    WellKnownItem { id: 0x1E, name: "Nugget" },
];

#[rustfmt::skip]
const HELD_ITEMS: &[WellKnownItem] = &[
    WellKnownItem { id: 0x53, name: "Leftovers" },
    WellKnownItem { id: 0x54, name: "Dragon Scale" },
    WellKnownItem { id: 0x64, name: "Berry" },
    WellKnownItem { id: 0x8B, name: "Focus Band" },
    WellKnownItem { id: 0x8E, name: "Kings Rock" },
    WellKnownItem { id: 0xAF, name: "Lucky Egg" },
    WellKnownItem { id: 0xB4, name: "Scope Lens" },
    WellKnownItem { id: 0xC3, name: "Quick Claw" },
    WellKnownItem { id: 0xC4, name: "Bright Powder" },
];

pub const HEALING_ITEMS: [u8; 5] = [0x0D, 0x0E, 0x10, 0x12, 0x19];
pub const STAT_ITEMS: [u8; 7] = [0x08, 0x2D, 0x2E, 0x2F, 0x30, 0x31, 0x4A];

pub fn species_name(species: u8) -> Option<&'static str> {
    match species {
        0 => None,
        id => SPECIES_NAMES.get(usize::from(id) - 1).copied(),
    }
}

pub fn move_name(move_id: u8) -> Option<&'static str> {
    match move_id {
        0 => None,
        id => MOVE_NAMES.get(usize::from(id) - 1).copied(),
    }
}

/// Name of anything that can sit in the item or ball pocket.
pub fn item_name(item: u8) -> Option<&'static str> {
    find(BALLS, item).or_else(|| find(ITEMS, item))
}

/// Held items include everything in the pockets plus battle-only items.
pub fn held_item_name(item: u8) -> Option<&'static str> {
    item_name(item).or_else(|| find(HELD_ITEMS, item))
}

/// Every ball id, in the order the presets add them.
pub fn ball_ids() -> impl Iterator<Item = u8> {
    BALLS.iter().map(|ball| ball.id)
}

fn find(table: &[WellKnownItem], id: u8) -> Option<&'static str> {
    table.iter().find(|item| item.id == id).map(|item| item.name)
}
