//! Built-in catalog
//!
//! Used when no catalog file exists, and as the template written by
//! `export_default_catalog`.

use super::merge::merge_builds;
use super::model::{BuildEntry, Catalog, ClassEntry, GameCatalog};

fn build(
    id: &str,
    name: &str,
    tier: &str,
    difficulty: &str,
    playstyle: &str,
    damage_type: &str,
    tags: &[&str],
) -> BuildEntry {
    BuildEntry {
        tier: Some(tier.to_string()),
        difficulty: Some(difficulty.to_string()),
        playstyle: Some(playstyle.to_string()),
        damage_type: Some(damage_type.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..BuildEntry::new(id, name)
    }
}

fn class(id: &str, name: &str, color: &str, base_class: Option<&str>, skills: Vec<BuildEntry>) -> ClassEntry {
    ClassEntry {
        id: id.to_string(),
        name: name.to_string(),
        color: Some(color.to_string()),
        base_class: base_class.map(str::to_string),
        skills,
    }
}

fn with_source(mut builds: Vec<BuildEntry>, source: &str) -> Vec<BuildEntry> {
    for b in &mut builds {
        b.source = Some(source.to_string());
    }
    builds
}

/// The default catalog: Diablo IV and Path of Exile
pub fn default_catalog() -> Catalog {
    let mut poe1 = poe1_guides();
    let report = merge_builds(&mut poe1, poe1_ninja_builds());
    log::debug!("Merged built-in poe.ninja builds: {}", report.summary());

    Catalog {
        games: vec![diablo4(), poe1],
    }
}

fn diablo4() -> GameCatalog {
    let source = "Maxroll";
    GameCatalog {
        id: "diablo4".to_string(),
        name: "Diablo IV".to_string(),
        classes: vec![
            class("barbarian", "Barbarian", "#c41e3a", None, with_source(vec![
                build("hota-barb", "Hammer of the Ancients", "S", "Easy", "Melee", "Physical", &["Bash", "Overpower"]),
                build("whirlwind-barb", "Whirlwind", "A", "Easy", "Melee", "Physical", &["Channel", "Bleed"]),
                build("rend-barb", "Rend", "B", "Medium", "Melee", "Physical", &["Bleed", "DoT"]),
                build("mighty-throw-barb", "Mighty Throw", "A", "Hard", "Ranged", "Physical", &["Throw"]),
            ], source)),
            class("druid", "Druid", "#ff7d0a", None, with_source(vec![
                build("pulverize-druid", "Pulverize", "S", "Easy", "Melee", "Earth", &["Werebear", "Overpower"]),
                build("tornado-druid", "Tornado", "A", "Medium", "Spell", "Storm", &["Wind"]),
                build("lightning-storm-druid", "Lightning Storm", "A", "Medium", "Spell", "Storm", &["Channel"]),
                build("shred-druid", "Shred", "B", "Hard", "Melee", "Physical", &["Werewolf", "Fast"]),
            ], source)),
            class("necromancer", "Necromancer", "#1eff00", None, with_source(vec![
                build("blood-surge-necro", "Blood Surge", "S", "Easy", "Spell", "Physical", &["Overpower", "Tanky"]),
                build("bone-spear-necro", "Bone Spear", "A", "Medium", "Spell", "Physical", &["Crit"]),
                build("minion-necro", "Minion Army", "A", "Easy", "Minion", "Physical", &["Summoner", "Tanky"]),
                build("blight-necro", "Blight", "C", "Medium", "Spell", "Shadow", &["DoT"]),
            ], source)),
            class("rogue", "Rogue", "#fff569", None, with_source(vec![
                build("twisting-blades-rogue", "Twisting Blades", "S", "Medium", "Melee", "Physical", &["Combo"]),
                build("rapid-fire-rogue", "Rapid Fire", "A", "Medium", "Ranged", "Physical", &["Bow", "Crit"]),
                build("death-trap-rogue", "Death Trap", "A", "Hard", "Trap", "Shadow", &["Burst"]),
                build("penetrating-shot-rogue", "Penetrating Shot", "B", "Easy", "Ranged", "Physical", &["Bow"]),
            ], source)),
            class("sorcerer", "Sorcerer", "#69ccf0", None, with_source(vec![
                build("ball-lightning-sorc", "Ball Lightning", "S", "Medium", "Spell", "Lightning", &["Crackling Energy"]),
                build("blizzard-sorc", "Blizzard", "A", "Easy", "Spell", "Cold", &["Freeze"]),
                build("firewall-sorc", "Firewall", "B", "Easy", "Spell", "Fire", &["DoT", "Burn"]),
                build("chain-lightning-sorc", "Chain Lightning", "A", "Medium", "Spell", "Lightning", &["Bounce"]),
            ], source)),
            class("spiritborn", "Spiritborn", "#00c8a0", None, with_source(vec![
                build("quill-volley-sb", "Quill Volley", "S", "Medium", "Ranged", "Physical", &["Eagle"]),
                build("crushing-hand-sb", "Crushing Hand", "A", "Easy", "Melee", "Physical", &["Gorilla", "Overpower"]),
                build("touch-of-death-sb", "Touch of Death", "B", "Hard", "Melee", "Poison", &["Centipede", "DoT"]),
            ], source)),
        ],
    }
}

fn poe1_guides() -> GameCatalog {
    let source = "Maxroll";
    GameCatalog {
        id: "poe1".to_string(),
        name: "Path of Exile".to_string(),
        classes: vec![
            class("juggernaut", "Juggernaut", "#a52a2a", Some("Marauder"), with_source(vec![
                build("boneshatter-juggernaut", "Boneshatter", "S", "Easy", "Melee", "Physical", &["League Starter", "Tanky"]),
                build("earthquake-juggernaut", "Earthquake", "B", "Medium", "Melee", "Physical", &["Slam"]),
            ], source)),
            class("chieftain", "Chieftain", "#d2691e", Some("Marauder"), with_source(vec![
                build("rf-chieftain", "Righteous Fire", "S", "Easy", "DoT", "Fire", &["League Starter", "Tanky"]),
                build("infernal-blow-chieftain", "Infernal Blow", "C", "Medium", "Melee", "Fire", &["Off-Meta"]),
            ], source)),
            class("berserker", "Berserker", "#8b0000", Some("Marauder"), with_source(vec![
                build("wild-strike-berserker", "Wild Strike", "C", "Medium", "Melee", "Elemental", &["Off-Meta"]),
            ], source)),
            class("deadeye", "Deadeye", "#228b22", Some("Ranger"), with_source(vec![
                build("tornado-shot-deadeye", "Tornado Shot", "S", "Medium", "Ranged", "Physical", &["Bow", "Mapper"]),
                build("spectral-throw-deadeye", "Spectral Throw", "C", "Medium", "Ranged", "Physical", &["Off-Meta"]),
            ], source)),
            class("raider", "Raider", "#32cd32", Some("Ranger"), with_source(vec![
                build("flicker-strike-raider", "Flicker Strike", "C", "Hard", "Melee", "Physical", &["Off-Meta", "Fast"]),
            ], source)),
            class("elementalist", "Elementalist", "#4169e1", Some("Witch"), with_source(vec![
                build("explosive-arrow-elementalist", "Explosive Arrow", "B", "Medium", "Ranged", "Fire", &["Off-Meta", "Ballista"]),
                build("discharge-ignite-elementalist", "Discharge", "C", "Hard", "Spell", "Fire", &["Off-Meta", "Ignite"]),
                build("herald-of-thunder-autobomber", "Herald of Thunder", "C", "Medium", "Autobomber", "Lightning", &["Off-Meta"]),
            ], source)),
            class("necromancer-poe", "Necromancer", "#6a5acd", Some("Witch"), with_source(vec![
                build("srs-necromancer", "Summon Raging Spirit", "A", "Easy", "Minion", "Fire", &["Summoner"]),
                build("soulwrest-phantasms", "Soulwrest Phantasms", "C", "Easy", "Minion", "Physical", &["Off-Meta"]),
            ], source)),
            class("occultist", "Occultist", "#9932cc", Some("Witch"), with_source(vec![
                build("bane-occultist", "Bane", "A", "Medium", "DoT", "Chaos", &["Curse"]),
                build("arakaali-fang-occultist", "Arakaali's Fang", "C", "Medium", "Minion", "Chaos", &["Off-Meta", "Spiders"]),
            ], source)),
            class("inquisitor", "Inquisitor", "#ffd700", Some("Templar"), with_source(vec![
                build("blazing-salvo-inquisitor", "Blazing Salvo", "C", "Medium", "Spell", "Fire", &["Off-Meta"]),
            ], source)),
            class("trickster", "Trickster", "#708090", Some("Shadow"), with_source(vec![
                build("lightning-warp-miner", "Lightning Warp", "C", "Hard", "Mine", "Lightning", &["Off-Meta"]),
            ], source)),
            class("assassin", "Assassin", "#2f4f4f", Some("Shadow"), with_source(vec![
                build("cast-on-crit-ice-nova", "Ice Nova", "C", "Hard", "CoC", "Cold", &["Off-Meta", "Crit"]),
            ], source)),
        ],
    }
}

/// Popular builds from poe.ninja, merged into the guide catalog at load
fn poe1_ninja_builds() -> Vec<ClassEntry> {
    let source = "poe.ninja";
    let league = Some("3.27".to_string());
    let mut classes = vec![
        class("juggernaut", "Juggernaut", "#a52a2a", Some("Marauder"), with_source(vec![
            build("boneshatter-juggernaut", "Boneshatter", "S", "Easy", "Melee", "Physical", &["Tanky"]),
            build("cyclone-juggernaut", "Cyclone", "A", "Easy", "Melee", "Physical", &["Channel"]),
        ], source)),
        class("deadeye", "Deadeye", "#228b22", Some("Ranger"), with_source(vec![
            build("lightning-arrow-deadeye", "Lightning Arrow", "S", "Easy", "Ranged", "Lightning", &["Bow", "Mapper"]),
            build("ts-deadeye-ninja", "tornado shot", "S", "Medium", "Ranged", "Physical", &["Bow"]),
        ], source)),
        class("hierophant", "Hierophant", "#f0e68c", Some("Templar"), with_source(vec![
            build("penance-brand-hierophant", "Penance Brand of Dissipation", "A", "Medium", "Brand", "Lightning", &["Brand"]),
        ], source)),
    ];
    for class in &mut classes {
        for b in &mut class.skills {
            b.league = league.clone();
            b.popularity = Some(1.0);
        }
    }
    classes
}
